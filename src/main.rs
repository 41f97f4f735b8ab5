mod app;
mod chart;
mod data;
mod error;
mod state;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use app::WeatherReportApp;
use data::model::MonthIndex;
use eframe::egui;
use state::ViewState;

/// Bundled station file, relative to the working directory.
pub const DATASET_PATH: &str = "us-weather-history/KCLT.csv";

fn dataset_path() -> PathBuf {
    let local = PathBuf::from(DATASET_PATH);
    if local.exists() {
        local
    } else {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(DATASET_PATH)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = dataset_path();
    let dataset = data::loader::load_file(&path).inspect_err(|e| log::error!("{e}"))?;
    log::info!(
        "Loaded {} records ({} columns) from {} with features {:?}",
        dataset.len(),
        dataset.columns().len(),
        path.display(),
        dataset.features()
    );
    if dataset.is_empty() {
        log::warn!("Station file has no records, the chart will stay empty");
    }

    let state = ViewState::new(Arc::new(dataset), MonthIndex::WEATHER_YEAR);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "US Weather Report",
        options,
        Box::new(move |_cc| Ok(Box::new(WeatherReportApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
