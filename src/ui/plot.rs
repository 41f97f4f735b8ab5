use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::chart::CHART_TITLE;
use crate::data::model::{Dataset, ACTUAL_MEAN_TEMP};
use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Temperature plot (central panel)
// ---------------------------------------------------------------------------

/// Actual mean temperature first, selected feature second.
const SERIES_COLORS: [Color32; 2] = [
    Color32::from_rgb(229, 151, 50),
    Color32::from_rgb(106, 181, 135),
];

const PLOT_HEIGHT: f32 = 380.0;

/// Dates sit on the x axis as day numbers counted from 0001-01-01.
fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Shown in place of the plot when no chart could be rendered.
fn missing_chart_text(dataset: &Dataset) -> String {
    if dataset.features().is_empty() {
        "The dataset has no numeric features to plot.".to_string()
    } else {
        format!("The dataset has no '{ACTUAL_MEAN_TEMP}' column to plot against.")
    }
}

/// Render the two chart series with a calendar x axis.
pub fn temperature_plot(ui: &mut Ui, state: &ViewState) {
    ui.label(RichText::new(CHART_TITLE).heading());

    let Some(chart) = &state.chart else {
        ui.label(missing_chart_text(state.dataset()));
        return;
    };

    if chart.actual.is_empty() {
        ui.label("No observations fall inside the selected period.");
    }

    Plot::new("temperature_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Date")
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, point| {
            let day = format_day(point.x);
            if name.is_empty() {
                format!("{day}\n{:.1}", point.y)
            } else {
                format!("{name}\n{day}\n{:.1}", point.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (series, color) in chart.series().into_iter().zip(SERIES_COLORS) {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .filter(|(_, v)| v.is_finite())
                    .map(|&(d, v)| [day_number(d), v])
                    .collect();

                plot_ui.line(
                    Line::new(points)
                        .name(&series.name)
                        .color(color)
                        .width(2.0),
                );
            }
        });
}
