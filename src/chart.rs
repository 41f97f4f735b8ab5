use chrono::NaiveDate;

use crate::data::filter::records_between;
use crate::data::model::{Dataset, MonthIndex, SliderRange, ACTUAL_MEAN_TEMP};
use crate::error::{DashboardError, Result};

/// Name of the series that is always plotted.
pub const ACTUAL_SERIES: &str = "actual-mean-temperature";

pub const CHART_TITLE: &str = "Temperature Plot";

// ---------------------------------------------------------------------------
// ChartSpec – what the chart region draws
// ---------------------------------------------------------------------------

/// One named line: `(date, value)` pairs in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Two lines over the same date window: the actual mean temperature and the
/// selected feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub actual: Series,
    pub feature: Series,
}

impl ChartSpec {
    pub fn series(&self) -> [&Series; 2] {
        [&self.actual, &self.feature]
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Build the chart for `feature` over the slider window.
///
/// Only records strictly between the two boundary months are kept; a
/// zero-width window or one outside the data gives two empty series.
pub fn render(
    dataset: &Dataset,
    months: &MonthIndex,
    feature: &str,
    range: SliderRange,
) -> Result<ChartSpec> {
    if !dataset.has_feature(feature) {
        return Err(DashboardError::InvalidFeature(feature.to_string()));
    }
    if !dataset.has_feature(ACTUAL_MEAN_TEMP) {
        return Err(DashboardError::InvalidFeature(ACTUAL_MEAN_TEMP.to_string()));
    }

    let (lower, upper) = match (months.boundary(range.lo()), months.boundary(range.hi())) {
        (Some(lower), Some(upper)) => (lower, upper),
        _ => {
            return Err(DashboardError::InvalidRange {
                lo: range.lo(),
                hi: range.hi(),
            })
        }
    };

    let window = records_between(dataset, lower, upper);

    let column = |name: &str| -> Vec<(NaiveDate, f64)> {
        window
            .iter()
            .map(|r| (r.date, r.value(name).unwrap_or(f64::NAN)))
            .collect()
    };

    Ok(ChartSpec {
        actual: Series {
            name: ACTUAL_SERIES.to_string(),
            points: column(ACTUAL_MEAN_TEMP),
        },
        feature: Series {
            name: feature.to_string(),
            points: column(feature),
        },
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::data::loader::{load_file, read_dataset};
    use crate::data::model::MONTH_COUNT;

    fn bundled() -> Dataset {
        load_file(&Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::DATASET_PATH)).unwrap()
    }

    fn dates(series: &Series) -> impl Iterator<Item = NaiveDate> + '_ {
        series.points.iter().map(|(d, _)| *d)
    }

    fn month_start(months: &MonthIndex, i: usize) -> NaiveDate {
        let m = months.boundary(i).unwrap();
        NaiveDate::from_ymd_opt(m.year, m.month, 1).unwrap()
    }

    #[test]
    fn every_valid_range_stays_strictly_inside_its_boundaries() {
        let ds = bundled();
        let months = MonthIndex::WEATHER_YEAR;
        for lo in 0..MONTH_COUNT {
            for hi in lo..MONTH_COUNT {
                let range = SliderRange::new(lo, hi).unwrap();
                let chart = render(&ds, &months, "average_max_temp", range).unwrap();
                assert_eq!(chart.actual.len(), chart.feature.len());

                let (low, high) = (month_start(&months, lo), month_start(&months, hi));
                for d in dates(&chart.actual).chain(dates(&chart.feature)) {
                    assert!(low < d && d < high, "{d} outside ({low}, {high})");
                }
            }
        }
    }

    #[test]
    fn zero_width_window_gives_empty_series() {
        let ds = bundled();
        for k in 0..MONTH_COUNT {
            let range = SliderRange::new(k, k).unwrap();
            let chart = render(&ds, &MonthIndex::WEATHER_YEAR, "actual_max_temp", range).unwrap();
            assert!(chart.actual.is_empty());
            assert!(chart.feature.is_empty());
            assert_eq!(chart.feature.name, "actual_max_temp");
        }
    }

    #[test]
    fn render_is_deterministic() {
        let ds = bundled();
        let range = SliderRange::new(2, 7).unwrap();
        let a = render(&ds, &MonthIndex::WEATHER_YEAR, "record_min_temp", range).unwrap();
        let b = render(&ds, &MonthIndex::WEATHER_YEAR, "record_min_temp", range).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_or_excluded_feature_is_rejected() {
        let ds = bundled();
        let range = SliderRange::DEFAULT;
        for name in ["dew_point", "date", "record_precipitation"] {
            let err = render(&ds, &MonthIndex::WEATHER_YEAR, name, range).unwrap_err();
            assert!(matches!(err, DashboardError::InvalidFeature(ref f) if f == name));
        }
    }

    #[test]
    fn average_min_temp_over_first_two_months() {
        let ds = bundled();
        let months = MonthIndex::WEATHER_YEAR;
        let chart = render(&ds, &months, "average_min_temp", SliderRange::new(0, 2).unwrap()).unwrap();

        assert_eq!(chart.actual.name, ACTUAL_SERIES);
        assert_eq!(chart.feature.name, "average_min_temp");

        // 2014-07-02 ..= 2014-08-31
        assert_eq!(chart.actual.len(), 61);
        let (low, high) = (month_start(&months, 0), month_start(&months, 2));
        assert!(dates(&chart.actual).all(|d| low < d && d < high));
        assert!(dates(&chart.actual).eq(dates(&chart.feature)));

        for ((date, actual), (_, feature)) in chart.actual.points.iter().zip(&chart.feature.points) {
            let record = ds.records().iter().find(|r| r.date == *date).unwrap();
            assert_eq!(Some(*actual), record.value("actual_mean_temp"));
            assert_eq!(Some(*feature), record.value("average_min_temp"));
        }
    }

    #[test]
    fn dataset_without_mean_temperature_cannot_chart() {
        let ds = read_dataset(
            "date,wind,meta\n2014-07-10,4,x\n".as_bytes(),
            Path::new("inline.csv"),
        )
        .unwrap();
        let err = render(&ds, &MonthIndex::WEATHER_YEAR, "wind", SliderRange::new(0, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidFeature(ref f) if f == ACTUAL_MEAN_TEMP));
    }
}
