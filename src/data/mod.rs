/// Data layer: station dataset, date windows, and ad-hoc uploads.
///
/// Architecture:
/// ```text
///   KCLT.csv                       uploaded .csv / .xls(x)
///      │                                   │
///      ▼                                   ▼
///   ┌──────────┐                      ┌──────────┐
///   │  loader  │ parse → Dataset      │  upload  │ bytes → UploadPreview
///   └──────────┘                      └──────────┘
///      │
///      ▼
///   ┌──────────┐
///   │  filter  │ open date window → &[StationRecord]
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod upload;
