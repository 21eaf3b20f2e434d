//! Chart Viewer Widget
//! Central panel with the two dashboard tabs, their charts and commentary.

use crate::charts::ChartPlotter;
use crate::data::MigrantRecord;
use crate::stats::{SeriesSummary, YearlyRate};
use egui::{Color32, RichText};

const TOP_DISTRICTS_NOTE: &str = "Each bar adds up the seven tracked nationality groups for one \
    district. Blank or malformed counts in the source table are counted as zero.";
const EXCHANGE_RATE_NOTE: &str = "Values are yearly means of the raw series. Years whose Year or \
    Value could not be read as a number are left out.";

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    TopDistricts,
    ExchangeRate,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 2] = [DashboardTab::TopDistricts, DashboardTab::ExchangeRate];

    pub fn title(self) -> &'static str {
        match self {
            DashboardTab::TopDistricts => "Top Districts (Bar)",
            DashboardTab::ExchangeRate => "Exchange Rate (Time-series)",
        }
    }

    /// Suggested file name when exporting this tab's chart.
    pub fn export_file_name(self) -> &'static str {
        match self {
            DashboardTab::TopDistricts => "top_districts.png",
            DashboardTab::ExchangeRate => "exchange_rate.png",
        }
    }
}

/// Tab strip plus the chart area for the active tab.
#[derive(Default)]
pub struct ChartViewer {
    pub active_tab: DashboardTab,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the tab strip
    pub fn show_tabs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in DashboardTab::ALL {
                ui.selectable_value(
                    &mut self.active_tab,
                    tab,
                    RichText::new(tab.title()).size(15.0),
                );
            }
        });
    }

    pub fn show_empty(ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("No Data").size(20.0));
        });
    }

    pub fn show_top_districts(ui: &mut egui::Ui, top: &[&MigrantRecord], top_n: usize) {
        ChartPlotter::draw_top_districts(ui, top, top_n);
        ui.add_space(8.0);
        Self::note(ui, TOP_DISTRICTS_NOTE);
    }

    pub fn show_exchange_rate(
        ui: &mut egui::Ui,
        series: &[YearlyRate],
        summary: Option<&SeriesSummary>,
    ) {
        ui.label(RichText::new("Exchange Rate — Year range only").size(18.0).strong());
        ui.add_space(6.0);
        ChartPlotter::draw_exchange_rate(ui, series);
        ui.add_space(8.0);

        if let Some(summary) = summary {
            Self::draw_summary_table(ui, summary);
            ui.add_space(8.0);
        }
        Self::note(ui, EXCHANGE_RATE_NOTE);
    }

    fn note(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(12.0).color(Color32::GRAY));
    }

    fn draw_summary_table(ui: &mut egui::Ui, summary: &SeriesSummary) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("rate_summary")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Years", "From", "To", "Min", "Max", "Mean", "Change"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        let change = summary
                            .percent_change
                            .map(|c| format!("{:+.1}%", c))
                            .unwrap_or_else(|| "-".to_string());
                        let change_color = match summary.percent_change {
                            Some(c) if c > 0.0 => Color32::from_rgb(220, 53, 69),
                            Some(c) if c < 0.0 => Color32::from_rgb(40, 167, 69),
                            _ => ui.visuals().text_color(),
                        };

                        ui.label(RichText::new(summary.years.to_string()).size(11.0));
                        ui.label(RichText::new(format!("{:.0}", summary.first.year)).size(11.0));
                        ui.label(RichText::new(format!("{:.0}", summary.last.year)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.min)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.max)).size(11.0));
                        ui.label(RichText::new(format!("{:.2}", summary.mean)).size(11.0));
                        ui.label(RichText::new(change).size(11.0).color(change_color));
                        ui.end_row();
                    });
            });
    }
}
