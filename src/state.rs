use std::sync::Arc;

use crate::chart::{self, ChartSpec};
use crate::data::model::{Dataset, MonthIndex, SliderRange};
use crate::data::upload::{self, UploadPreview};

// ---------------------------------------------------------------------------
// Inputs, regions, and the dispatch table between them
// ---------------------------------------------------------------------------

/// UI controls that emit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputId {
    FeatureSelector,
    DateSlider,
    UploadZone,
}

/// View regions that are recomputed in response to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Chart,
    Upload,
}

/// Which region each input drives.
pub const BINDINGS: [(InputId, Region); 3] = [
    (InputId::FeatureSelector, Region::Chart),
    (InputId::DateSlider, Region::Chart),
    (InputId::UploadZone, Region::Upload),
];

pub fn region_for(input: InputId) -> Region {
    BINDINGS
        .iter()
        .find(|(id, _)| *id == input)
        .map(|(_, region)| *region)
        .unwrap_or(Region::Chart)
}

/// A file handed over by drag-and-drop or the file dialog.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    FeatureSelected(String),
    RangeChanged(SliderRange),
    /// `None` when the drop carried no file.
    FileDropped(Option<UploadedFile>),
    /// A file arrived but its bytes could not be read.
    UploadUnreadable(String),
}

impl ViewEvent {
    pub fn source(&self) -> InputId {
        match self {
            ViewEvent::FeatureSelected(_) => InputId::FeatureSelector,
            ViewEvent::RangeChanged(_) => InputId::DateSlider,
            ViewEvent::FileDropped(_) | ViewEvent::UploadUnreadable(_) => InputId::UploadZone,
        }
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// The single source of UI state. The dataset is shared read-only; each
/// event recomputes exactly one region and leaves the other untouched.
pub struct ViewState {
    dataset: Arc<Dataset>,
    months: MonthIndex,

    /// Current dropdown value (None when the dataset has no features).
    pub feature: Option<String>,

    /// Current slider position.
    pub range: SliderRange,

    /// Last successfully rendered chart.
    pub chart: Option<ChartSpec>,

    /// Preview of the most recent upload (None until a file is dropped).
    pub upload: Option<UploadPreview>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewState {
    /// Initial state: first feature, default slider, empty upload panel.
    pub fn new(dataset: Arc<Dataset>, months: MonthIndex) -> Self {
        let feature = dataset.features().first().cloned();
        let mut state = Self {
            dataset,
            months,
            feature,
            range: SliderRange::DEFAULT,
            chart: None,
            upload: None,
            status_message: None,
        };
        state.refresh_chart();
        state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn months(&self) -> &MonthIndex {
        &self.months
    }

    /// Apply one input event and recompute the region bound to its source.
    pub fn dispatch(&mut self, event: ViewEvent) {
        let region = region_for(event.source());
        log::debug!("{:?} -> {region:?}", event.source());

        match event {
            ViewEvent::FeatureSelected(feature) => self.feature = Some(feature),
            ViewEvent::RangeChanged(range) => self.range = range,
            ViewEvent::FileDropped(None) => return,
            ViewEvent::FileDropped(Some(file)) => {
                self.upload = Some(upload::parse(&file.bytes, &file.name));
                return;
            }
            ViewEvent::UploadUnreadable(name) => {
                self.upload = Some(UploadPreview::error(&name));
                return;
            }
        }

        if region == Region::Chart {
            self.refresh_chart();
        }
    }

    /// Re-render the chart from the current dropdown and slider values. An
    /// unknown feature keeps the previous chart on screen.
    fn refresh_chart(&mut self) {
        let Some(feature) = self.feature.as_deref() else {
            return;
        };
        match chart::render(&self.dataset, &self.months, feature, self.range) {
            Ok(spec) => {
                log::debug!("Chart for '{feature}' has {} points", spec.actual.len());
                self.chart = Some(spec);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Chart not updated: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::chart::ACTUAL_SERIES;
    use crate::data::loader::load_file;

    fn state() -> ViewState {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::DATASET_PATH);
        ViewState::new(Arc::new(load_file(&path).unwrap()), MonthIndex::WEATHER_YEAR)
    }

    fn csv_file(name: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            bytes: b"a,b\n1,2\n".to_vec(),
        }
    }

    #[test]
    fn bindings_route_inputs_to_regions() {
        assert_eq!(region_for(InputId::FeatureSelector), Region::Chart);
        assert_eq!(region_for(InputId::DateSlider), Region::Chart);
        assert_eq!(region_for(InputId::UploadZone), Region::Upload);
    }

    #[test]
    fn initial_state_uses_first_feature_and_default_range() {
        let s = state();
        assert_eq!(s.feature.as_deref(), Some("actual_mean_temp"));
        assert_eq!(s.range, SliderRange::new(3, 4).unwrap());
        assert!(s.upload.is_none());

        let chart = s.chart.as_ref().unwrap();
        assert_eq!(chart.actual.name, ACTUAL_SERIES);
        // 2014-10-02 ..= 2014-10-31
        assert_eq!(chart.actual.len(), 30);
    }

    #[test]
    fn chart_events_leave_upload_alone() {
        let mut s = state();
        s.dispatch(ViewEvent::FileDropped(Some(csv_file("a.csv"))));
        let upload = s.upload.clone();

        s.dispatch(ViewEvent::FeatureSelected("average_min_temp".into()));
        s.dispatch(ViewEvent::RangeChanged(SliderRange::new(0, 2).unwrap()));

        assert_eq!(s.upload, upload);
        let chart = s.chart.as_ref().unwrap();
        assert_eq!(chart.feature.name, "average_min_temp");
        assert_eq!(chart.feature.len(), 61);
    }

    #[test]
    fn upload_events_leave_chart_alone() {
        let mut s = state();
        let chart = s.chart.clone();

        s.dispatch(ViewEvent::FileDropped(Some(csv_file("b.csv"))));
        assert_eq!(s.chart, chart);
        assert!(matches!(s.upload, Some(UploadPreview::Table(ref t)) if t.filename == "b.csv"));

        s.dispatch(ViewEvent::FileDropped(Some(csv_file("b.txt"))));
        assert_eq!(s.chart, chart);
        assert!(matches!(s.upload, Some(UploadPreview::Error { .. })));
    }

    #[test]
    fn drop_without_file_is_a_no_op() {
        let mut s = state();
        s.dispatch(ViewEvent::FileDropped(Some(csv_file("c.csv"))));
        let before = s.upload.clone();
        s.dispatch(ViewEvent::FileDropped(None));
        assert_eq!(s.upload, before);
    }

    #[test]
    fn unreadable_upload_shows_error() {
        let mut s = state();
        s.dispatch(ViewEvent::UploadUnreadable("gone.csv".into()));
        assert_eq!(s.upload, Some(UploadPreview::error("gone.csv")));
    }

    #[test]
    fn unknown_feature_keeps_previous_chart() {
        let mut s = state();
        let chart = s.chart.clone();
        s.dispatch(ViewEvent::FeatureSelected("dew_point".into()));
        assert_eq!(s.chart, chart);
        assert!(s.status_message.is_some());
    }
}
