//! Chart Plotter Module
//! Creates the interactive bar and line charts using egui_plot.

use crate::data::MigrantRecord;
use crate::stats::YearlyRate;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const LINE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

const CHART_HEIGHT: f32 = 420.0;

/// Draws the dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn bar_chart_title(top_n: usize) -> String {
        format!("Top {} Districts by Selected Migrants", top_n)
    }

    pub const RATE_CHART_TITLE: &'static str = "Lebanese Pound per USD (raw)";

    /// Bar chart of districts by total migrants, one bar per record in order.
    pub fn draw_top_districts(ui: &mut egui::Ui, top: &[&MigrantRecord], top_n: usize) {
        ui.label(RichText::new(Self::bar_chart_title(top_n)).size(16.0).strong());

        let labels: Vec<String> = top.iter().map(|r| r.district.clone()).collect();
        let bar_count = labels.len();

        let bars: Vec<Bar> = top
            .iter()
            .enumerate()
            .map(|(i, record)| {
                Bar::new(i as f64, record.total_migrants as f64)
                    .name(&record.district)
                    .width(0.7)
                    .fill(BAR_COLOR)
            })
            .collect();

        Plot::new("top_districts")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Total migrants")
            .include_y(0.0)
            // One tick per bar so every district gets its label
            .x_grid_spacer(move |_input| {
                (0..bar_count)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Total migrants"));
            });
    }

    /// Line chart with markers of the yearly mean exchange rate.
    pub fn draw_exchange_rate(ui: &mut egui::Ui, series: &[YearlyRate]) {
        ui.label(RichText::new(Self::RATE_CHART_TITLE).size(16.0).strong());

        let points: Vec<[f64; 2]> = series.iter().map(|p| [p.year, p.mean_value]).collect();

        Plot::new("exchange_rate")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Value")
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .label_formatter(|_name, value| format!("{:.0}: {:.2}", value.x, value.y))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Value"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(LINE_COLOR),
                );
            });
    }
}
