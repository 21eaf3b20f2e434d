//! Control Panel Widget
//! Left side panel with data sources, actions and status, plus the per-tab sliders.

use crate::config::DashboardConfig;
use egui::{Color32, RichText, Slider};
use std::path::{Path, PathBuf};

/// User selections driving the views.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSettings {
    pub migrants_path: PathBuf,
    pub rates_path: PathBuf,
    pub top_n: usize,
    /// Inclusive (from, to) year selection.
    pub year_range: (i64, i64),
}

/// Left side control panel with file selection and export controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub top_n_bounds: (usize, usize),
    pub year_bounds: Option<(i64, i64)>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            settings: UserSettings {
                migrants_path: config.migrants_path.clone(),
                rates_path: config.rates_path.clone(),
                top_n: config.top_n_default,
                year_range: (0, 0),
            },
            top_n_bounds: (config.top_n_min, config.top_n_max),
            year_bounds: None,
            status: "Ready".to_string(),
        }
    }

    /// New year span after a load; the selection resets to the full span.
    pub fn set_year_bounds(&mut self, bounds: Option<(i64, i64)>) {
        self.year_bounds = bounds;
        if let Some(bounds) = bounds {
            self.settings.year_range = bounds;
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        is_loading: bool,
        has_data: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Migrant Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Districts & Exchange Rate")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        if Self::file_row(ui, "Migrants", &self.settings.migrants_path) {
            action = ControlPanelAction::BrowseMigrants;
        }
        ui.add_space(4.0);
        if Self::file_row(ui, "Exchange rate", &self.settings.rates_path) {
            action = ControlPanelAction::BrowseRates;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!is_loading, |ui| {
                let button = egui::Button::new(RichText::new("⟳ Reload Data").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            let export_enabled = !is_loading && has_data;
            ui.add_enabled_ui(export_enabled, |ui| {
                let export_button =
                    egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                        .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if is_loading {
                ui.spinner();
            }
            let status_color = if self.status.contains("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.status.starts_with("Loaded") {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }

    /// One file name with a Browse button. Returns true when Browse was clicked.
    fn file_row(ui: &mut egui::Ui, label: &str, path: &Path) -> bool {
        let mut clicked = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                ui.horizontal(|ui| {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(name).size(12.0)).on_hover_text(path.display().to_string());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            clicked = true;
                        }
                    });
                });
            });
        clicked
    }

    /// "Top N districts" slider shown above the bar chart.
    pub fn top_n_slider(&mut self, ui: &mut egui::Ui) {
        let (min, max) = self.top_n_bounds;
        ui.add(Slider::new(&mut self.settings.top_n, min..=max).text("Top N districts (by total)"));
    }

    /// From/to year sliders shown above the line chart, kept in order.
    pub fn year_range_sliders(&mut self, ui: &mut egui::Ui) {
        let Some((min, max)) = self.year_bounds else {
            ui.label(RichText::new("No exchange-rate data").color(Color32::GRAY));
            return;
        };

        let (from, to) = &mut self.settings.year_range;
        ui.label(RichText::new("Year range").strong());
        let from_changed = ui
            .add(Slider::new(from, min..=max).step_by(1.0).text("From"))
            .changed();
        let to_changed = ui
            .add(Slider::new(to, min..=max).step_by(1.0).text("To"))
            .changed();

        if *from > *to {
            if from_changed {
                *to = *from;
            } else if to_changed {
                *from = *to;
            }
        }
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseMigrants,
    BrowseRates,
    Reload,
    ExportPng,
}
