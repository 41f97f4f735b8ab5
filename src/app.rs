use eframe::egui::{self, ScrollArea, Ui};

use crate::state::ViewState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WeatherReportApp {
    pub state: ViewState,
}

impl WeatherReportApp {
    pub fn new(state: ViewState) -> Self {
        Self { state }
    }
}

impl eframe::App for WeatherReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Files dropped anywhere on the window ----
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(event) = panels::dropped_files_event(&dropped) {
            self.state.dispatch(event);
        }

        // ---- Top panel: title banner ----
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            panels::header(ui);
            if let Some(msg) = &self.state.status_message {
                ui.colored_label(egui::Color32::RED, msg);
            }
        });

        // ---- Central panel: upload, chart, controls ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::upload_zone(ui, &mut self.state);
                    ui.add_space(12.0);
                    plot::temperature_plot(ui, &self.state);
                    ui.add_space(12.0);
                    panels::chart_controls(ui, &mut self.state);
                });
        });
    }
}
