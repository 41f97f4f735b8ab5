use std::path::Path;

use eframe::egui::{self, Color32, RichText, Slider, Stroke, Ui};

use crate::data::model::{SliderRange, MONTH_COUNT};
use crate::state::{UploadedFile, ViewEvent, ViewState};
use crate::ui::table;

// ---------------------------------------------------------------------------
// Page header
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new("US Weather Report").size(28.0));
    egui::Frame::new()
        .fill(Color32::from_rgb(58, 170, 178))
        .inner_margin(egui::Margin::same(24))
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new("A graph to show the fluctuations in temperature:")
                    .size(22.0)
                    .color(Color32::WHITE),
            );
        });
}

// ---------------------------------------------------------------------------
// Upload zone + preview
// ---------------------------------------------------------------------------

/// Render the drop zone and, below it, the preview of the last upload.
pub fn upload_zone(ui: &mut Ui, state: &mut ViewState) {
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let stroke = if hovering {
        Stroke::new(2.0, ui.visuals().selection.stroke.color)
    } else {
        Stroke::new(1.0, Color32::GRAY)
    };

    egui::Frame::new()
        .stroke(stroke)
        .corner_radius(egui::CornerRadius::same(5))
        .inner_margin(egui::Margin::same(18))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Drag and Drop or");
                if ui.link("Select Files").clicked() {
                    if let Some(event) = open_file_dialog() {
                        state.dispatch(event);
                    }
                }
            });
        });

    if let Some(preview) = &state.upload {
        table::upload_preview(ui, preview);
    }
}

// ---------------------------------------------------------------------------
// Chart controls
// ---------------------------------------------------------------------------

/// Feature dropdown and the dual-handle month slider.
pub fn chart_controls(ui: &mut Ui, state: &mut ViewState) {
    feature_selector(ui, state);
    ui.add_space(12.0);
    month_slider(ui, state);
}

fn feature_selector(ui: &mut Ui, state: &mut ViewState) {
    let features = state.dataset().features().to_vec();
    let current = state.feature.clone().unwrap_or_default();
    let mut picked = None;

    ui.label(RichText::new("Choose a feature for Y-Axis").size(18.0));
    egui::ComboBox::from_id_salt("feature")
        .selected_text(if current.is_empty() { "Select Y-axis" } else { current.as_str() })
        .width(300.0)
        .show_ui(ui, |ui: &mut Ui| {
            for feature in &features {
                if ui.selectable_label(current == *feature, feature).clicked() {
                    picked = Some(feature.clone());
                }
            }
        });

    if let Some(feature) = picked.filter(|f| *f != current) {
        state.dispatch(ViewEvent::FeatureSelected(feature));
    }
}

fn month_slider(ui: &mut Ui, state: &mut ViewState) {
    let months = *state.months();
    let mut lo = state.range.lo();
    let mut hi = state.range.hi();

    ui.label(RichText::new("Time Period").size(18.0));
    let lo_changed = ui
        .add(
            Slider::new(&mut lo, 0..=MONTH_COUNT - 1)
                .text("from")
                .custom_formatter(move |v, _| months.label(v as usize)),
        )
        .changed();
    let hi_changed = ui
        .add(
            Slider::new(&mut hi, 0..=MONTH_COUNT - 1)
                .text("to")
                .custom_formatter(move |v, _| months.label(v as usize)),
        )
        .changed();

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for month in months.months() {
            ui.small(month.to_string());
        }
    });

    if !(lo_changed || hi_changed) {
        return;
    }

    // Handles push each other rather than cross.
    if lo > hi {
        if lo_changed {
            hi = lo;
        } else {
            lo = hi;
        }
    }

    match SliderRange::new(lo, hi) {
        Ok(range) => state.dispatch(ViewEvent::RangeChanged(range)),
        Err(e) => log::error!("Slider produced {e}"),
    }
}

// ---------------------------------------------------------------------------
// File input
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<ViewEvent> {
    let path = rfd::FileDialog::new()
        .set_title("Upload a table")
        .add_filter("Supported files", &["csv", "xls", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx"])
        .pick_file()?;

    let name = file_name(&path);
    Some(read_upload(name, &path))
}

/// Turn the files of one drag-and-drop into an upload event. Only the first
/// file is used.
pub fn dropped_files_event(files: &[egui::DroppedFile]) -> Option<ViewEvent> {
    let (first, rest) = files.split_first()?;
    if !rest.is_empty() {
        log::warn!("Dropped {} files, only '{}' is previewed", files.len(), first.name);
    }

    let name = match (&first.path, first.name.is_empty()) {
        (Some(path), true) => file_name(path),
        _ => first.name.clone(),
    };

    if let Some(bytes) = &first.bytes {
        return Some(ViewEvent::FileDropped(Some(UploadedFile {
            name,
            bytes: bytes.to_vec(),
        })));
    }
    match &first.path {
        Some(path) => Some(read_upload(name, path)),
        None => Some(ViewEvent::FileDropped(None)),
    }
}

fn read_upload(name: String, path: &Path) -> ViewEvent {
    match std::fs::read(path) {
        Ok(bytes) => ViewEvent::FileDropped(Some(UploadedFile { name, bytes })),
        Err(e) => {
            log::warn!("Failed to read {}: {e}", path.display());
            ViewEvent::UploadUnreadable(name)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
