use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::NaiveDate;

use super::model::{feature_columns, Dataset, StationRecord};
use crate::error::{DashboardError, Result};

/// Date layouts accepted in the first column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the station dataset from a CSV file.
///
/// Layout: `date, <feature 1..N>, <trailing column>`. The first column must
/// hold calendar dates in ascending order, the feature columns must be
/// numeric, and the trailing column is skipped.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| DashboardError::Load {
        path: path.to_path_buf(),
        reason: format!("opening file: {e}"),
    })?;
    read_dataset(file, path)
}

/// Parse a station dataset from any reader. `origin` only labels errors.
pub fn read_dataset<R: Read>(reader: R, origin: &Path) -> Result<Dataset> {
    let (columns, records) = parse_records(reader).map_err(|e| DashboardError::Load {
        path: origin.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    check_sorted(&records)?;

    Ok(Dataset::new(records, columns))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

fn parse_records<R: Read>(reader: R) -> anyhow::Result<(Vec<String>, Vec<StationRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.len() < 2 {
        bail!(
            "expected a date column and at least one feature, found {} column(s)",
            columns.len()
        );
    }

    let features = feature_columns(&columns);

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let raw_date = record.get(0).unwrap_or("");
        let date = parse_date(raw_date)
            .with_context(|| format!("row {row_no}: '{raw_date}' is not a date"))?;

        let mut values = BTreeMap::new();
        for (offset, name) in features.iter().enumerate() {
            let cell = record.get(offset + 1).unwrap_or("");
            let value = parse_number(cell)
                .with_context(|| format!("row {row_no}, column '{name}': '{cell}' is not a number"))?;
            values.insert(name.clone(), value);
        }

        records.push(StationRecord { date, values });
    }

    Ok((columns, records))
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .with_context(|| format!("no known date layout matches '{s}'"))
}

/// Empty cells load as NaN, the way a dataframe reader fills gaps.
fn parse_number(s: &str) -> anyhow::Result<f64> {
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(s.parse::<f64>()?)
}

/// Range filtering relies on date order, so an out-of-order row is fatal
/// rather than silently re-sorted.
fn check_sorted(records: &[StationRecord]) -> Result<()> {
    for (row, pair) in records.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(DashboardError::Invariant {
                row: row + 1,
                previous: pair[0].date,
                found: pair[1].date,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(text: &str) -> Result<Dataset> {
        read_dataset(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn loads_features_between_date_and_trailing_column() {
        let ds = load_str(
            "date,actual_mean_temp,average_min_temp,station\n\
             2014-7-1,77,69,KCLT\n\
             2014-7-2,82,70,KCLT\n",
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features(), ["actual_mean_temp", "average_min_temp"]);
        assert_eq!(ds.columns().len(), 4);

        let first = &ds.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2014, 7, 1).unwrap());
        assert_eq!(first.value("average_min_temp"), Some(69.0));
        assert_eq!(first.value("station"), None);
    }

    #[test]
    fn empty_numeric_cell_is_nan() {
        let ds = load_str("date,a,meta\n2014-07-01,,x\n").unwrap();
        assert!(ds.records()[0].value("a").unwrap().is_nan());
    }

    #[test]
    fn single_column_is_a_load_error() {
        let err = load_str("date\n2014-07-01\n").unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }), "{err}");
    }

    #[test]
    fn out_of_order_row_is_an_invariant_error() {
        let err = load_str(
            "date,a,meta\n\
             2014-07-01,1,x\n\
             2014-07-03,2,x\n\
             2014-07-02,3,x\n",
        )
        .unwrap_err();

        match err {
            DashboardError::Invariant {
                row,
                previous,
                found,
            } => {
                assert_eq!(row, 2);
                assert_eq!(previous, NaiveDate::from_ymd_opt(2014, 7, 3).unwrap());
                assert_eq!(found, NaiveDate::from_ymd_opt(2014, 7, 2).unwrap());
            }
            other => panic!("expected invariant error, got {other}"),
        }
    }

    #[test]
    fn repeated_dates_are_accepted() {
        let ds = load_str("date,a,meta\n2014-07-01,1,x\n2014-07-01,2,x\n").unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn bad_date_and_bad_number_are_load_errors() {
        assert!(matches!(
            load_str("date,a,meta\nyesterday,1,x\n"),
            Err(DashboardError::Load { .. })
        ));
        let err = load_str("date,a,meta\n2014-07-01,warm,x\n").unwrap_err();
        assert!(err.to_string().contains("column 'a'"), "{err}");
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
    }

    #[test]
    fn bundled_station_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::DATASET_PATH);
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 365);
        assert_eq!(ds.features().first().map(String::as_str), Some("actual_mean_temp"));
        assert!(ds.has_feature("average_min_temp"));
        assert!(!ds.has_feature("record_precipitation"));
    }
}
