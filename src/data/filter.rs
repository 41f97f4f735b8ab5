use super::model::{Dataset, StationRecord, YearMonth};

// ---------------------------------------------------------------------------
// Date window over the sorted dataset
// ---------------------------------------------------------------------------

/// Return the contiguous run of records whose date lies strictly after the
/// first day of `lower` and strictly before the first day of `upper`.
///
/// Both ends are open, so a record dated exactly on a boundary month start is
/// excluded. An empty or inverted window yields an empty slice.
pub fn records_between(dataset: &Dataset, lower: YearMonth, upper: YearMonth) -> &[StationRecord] {
    let records = dataset.records();
    let start = records.partition_point(|r| !lower.is_before(r.date));
    let end = records.partition_point(|r| upper.is_after(r.date));
    if start >= end {
        return &[];
    }
    &records[start..end]
}
