use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can go wrong between loading the station file and
/// rendering a view region.
///
/// Load and invariant errors are fatal at startup. The rest are raised per
/// interaction and handled by the view controller without touching other
/// regions.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load dataset {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("dataset not sorted by date: row {row} ({found}) comes after {previous}")]
    Invariant {
        row: usize,
        previous: NaiveDate,
        found: NaiveDate,
    },

    #[error("unknown feature '{0}'")]
    InvalidFeature(String),

    #[error("invalid slider range [{lo}, {hi}]")]
    InvalidRange { lo: usize, hi: usize },

    #[error("could not parse upload '{filename}': {reason}")]
    UploadParse { filename: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
