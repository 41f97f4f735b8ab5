use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{DashboardError, Result};

/// Column plotted alongside every selected feature.
pub const ACTUAL_MEAN_TEMP: &str = "actual_mean_temp";

// ---------------------------------------------------------------------------
// StationRecord – one row of the station file
// ---------------------------------------------------------------------------

/// A single day of station observations.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub date: NaiveDate,
    /// Numeric feature columns: column_name → value (NaN for empty cells).
    pub values: BTreeMap<String, f64>,
}

impl StationRecord {
    pub fn value(&self, feature: &str) -> Option<f64> {
        self.values.get(feature).copied()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded station file
// ---------------------------------------------------------------------------

/// The station dataset, sorted ascending by date.
///
/// Only the loader builds one, after it has checked the ordering, so every
/// `Dataset` in the process satisfies the invariant.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<StationRecord>,
    /// Every header in file order, including the date and trailing columns.
    columns: Vec<String>,
    /// Selectable features: all columns except the first and the last.
    features: Vec<String>,
}

impl Dataset {
    pub(crate) fn new(records: Vec<StationRecord>, columns: Vec<String>) -> Self {
        let features = feature_columns(&columns).to_vec();
        Dataset {
            records,
            columns,
            features,
        }
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The date column comes first and the trailing metadata column last; what
/// lies between is plottable.
pub(crate) fn feature_columns(columns: &[String]) -> &[String] {
    if columns.len() < 2 {
        return &[];
    }
    &columns[1..columns.len() - 1]
}

// ---------------------------------------------------------------------------
// MonthIndex – slider tick labels
// ---------------------------------------------------------------------------

/// A calendar month, used as a slider boundary. As a boundary it stands for
/// the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    /// `date` lies strictly after the first day of this month.
    pub fn is_before(&self, date: NaiveDate) -> bool {
        (date.year(), date.month(), date.day()) > (self.year, self.month, 1)
    }

    /// `date` lies strictly before the first day of this month.
    pub fn is_after(&self, date: NaiveDate) -> bool {
        (date.year(), date.month()) < (self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub const MONTH_COUNT: usize = 12;

/// Fixed, strictly increasing sequence of twelve month labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    months: [YearMonth; MONTH_COUNT],
}

impl MonthIndex {
    /// July 2014 through June 2015, the span of the bundled station file.
    pub const WEATHER_YEAR: MonthIndex = MonthIndex {
        months: [
            YearMonth::new(2014, 7),
            YearMonth::new(2014, 8),
            YearMonth::new(2014, 9),
            YearMonth::new(2014, 10),
            YearMonth::new(2014, 11),
            YearMonth::new(2014, 12),
            YearMonth::new(2015, 1),
            YearMonth::new(2015, 2),
            YearMonth::new(2015, 3),
            YearMonth::new(2015, 4),
            YearMonth::new(2015, 5),
            YearMonth::new(2015, 6),
        ],
    };

    pub fn months(&self) -> &[YearMonth; MONTH_COUNT] {
        &self.months
    }

    /// Boundary month at slider position `index`.
    pub fn boundary(&self, index: usize) -> Option<YearMonth> {
        self.months.get(index).copied()
    }

    pub fn label(&self, index: usize) -> String {
        self.boundary(index)
            .map(|m| m.to_string())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// SliderRange – the dual-handle slider value
// ---------------------------------------------------------------------------

/// A pair of indices into a [`MonthIndex`], `lo <= hi < MONTH_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliderRange {
    lo: usize,
    hi: usize,
}

impl SliderRange {
    /// Initial slider position: the fourth and fifth months.
    pub const DEFAULT: SliderRange = SliderRange { lo: 3, hi: 4 };

    pub fn new(lo: usize, hi: usize) -> Result<Self> {
        if lo > hi || hi >= MONTH_COUNT {
            return Err(DashboardError::InvalidRange { lo, hi });
        }
        Ok(SliderRange { lo, hi })
    }

    pub fn lo(&self) -> usize {
        self.lo
    }

    pub fn hi(&self) -> usize {
        self.hi
    }
}
