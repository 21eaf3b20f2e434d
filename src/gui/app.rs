//! Migrant Dashboard Main Application
//! Main window with control panel and the tabbed chart area.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{CleanedData, DataLoader, InputPaths, LoadCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DashboardTab};
use crate::stats::{Aggregator, SeriesSummary, YearlyRate};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Size of exported PNG charts
const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 900;

/// CSV loading result from background thread
enum LoadResult {
    Complete { paths: InputPaths, data: CleanedData },
    Error { paths: InputPaths, message: String },
}

/// Which input a Browse button targets.
#[derive(Debug, Clone, Copy)]
enum InputFile {
    Migrants,
    Rates,
}

/// Main application window.
pub struct DashboardApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    cache: LoadCache,

    data: Option<Arc<CleanedData>>,
    /// Yearly means of the loaded exchange-rate points, full span.
    yearly: Vec<YearlyRate>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self::with_config(config);
        app.start_load(false);
        app
    }

    /// App state with nothing loaded yet.
    fn with_config(config: DashboardConfig) -> Self {
        Self {
            control_panel: ControlPanel::new(&config),
            chart_viewer: ChartViewer::new(),
            cache: LoadCache::new(),
            data: None,
            yearly: Vec::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    fn current_paths(&self) -> InputPaths {
        InputPaths::new(
            self.control_panel.settings.migrants_path.clone(),
            self.control_panel.settings.rates_path.clone(),
        )
    }

    /// Load the selected input pair, from the cache when possible.
    fn start_load(&mut self, force: bool) {
        if self.is_loading {
            return; // Already loading
        }

        let paths = self.current_paths();
        if force && self.cache.invalidate(&paths) {
            debug!(?paths, "Cache entry invalidated");
        }

        if let Some(data) = self.cache.get(&paths) {
            debug!(?paths, "Using cached data");
            self.apply_data(data);
            return;
        }

        self.control_panel.set_status("Loading CSV files...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        // Load CSV in background thread
        thread::spawn(move || {
            let result = match DataLoader::load_and_clean(&paths.migrants, &paths.rates) {
                Ok(data) => LoadResult::Complete { paths, data },
                Err(e) => LoadResult::Error {
                    paths,
                    message: e.to_string(),
                },
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { paths, data }) => {
                self.is_loading = false;
                let data = self.cache.insert(paths.clone(), data);
                if paths == self.current_paths() {
                    self.apply_data(data);
                } else {
                    // Selection changed while loading
                    self.start_load(false);
                }
            }
            Ok(LoadResult::Error { paths, message }) => {
                self.is_loading = false;
                self.clear_data();
                error!(?paths, %message, "Failed to load input data");
                self.control_panel
                    .set_status(&format!("Error: {}", message));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_loading = false;
                self.clear_data();
                self.control_panel
                    .set_status("Error: loader stopped unexpectedly");
            }
        }
    }

    fn apply_data(&mut self, data: Arc<CleanedData>) {
        self.yearly = Aggregator::yearly_means(&data.exchange_rates);
        self.control_panel
            .set_year_bounds(Aggregator::year_bounds(&self.yearly));
        self.control_panel.set_status(&format!(
            "Loaded {} districts, {} years",
            data.migrants.len(),
            self.yearly.len()
        ));
        info!(
            districts = data.migrants.len(),
            years = self.yearly.len(),
            "Dashboard data ready"
        );
        self.data = Some(data);
    }

    /// Drop the views of the previous input pair after a failed load.
    fn clear_data(&mut self) {
        self.data = None;
        self.yearly.clear();
        self.control_panel.set_year_bounds(None);
    }

    /// Pick another input file and reload
    fn handle_browse(&mut self, which: InputFile) {
        if self.is_loading {
            return;
        }

        let title = match which {
            InputFile::Migrants => "Select migrant counts CSV",
            InputFile::Rates => "Select exchange rate CSV",
        };
        let Some(path) = rfd::FileDialog::new()
            .set_title(title)
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return; // User cancelled
        };

        match which {
            InputFile::Migrants => self.control_panel.settings.migrants_path = path,
            InputFile::Rates => self.control_panel.settings.rates_path = path,
        }
        self.start_load(false);
    }

    /// Render the active tab's chart to PNG and open it
    fn handle_export_png(&mut self) {
        let Some(data) = self.data.clone() else {
            self.control_panel.set_status("No data to export");
            return;
        };
        let tab = self.chart_viewer.active_tab;

        let output_path: PathBuf = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(tab.export_file_name())
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let settings = &self.control_panel.settings;
        let rendered = match tab {
            DashboardTab::TopDistricts => {
                let top = Aggregator::top_districts(&data.migrants, settings.top_n);
                StaticChartRenderer::render_top_districts(
                    &top,
                    settings.top_n,
                    EXPORT_WIDTH,
                    EXPORT_HEIGHT,
                )
            }
            DashboardTab::ExchangeRate => {
                let series = Aggregator::filter_year_range(&self.yearly, settings.year_range);
                StaticChartRenderer::render_exchange_rate(&series, EXPORT_WIDTH, EXPORT_HEIGHT)
            }
        };

        let saved = rendered.and_then(|image| StaticChartRenderer::save(&image, &output_path));
        match saved {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
                if let Err(e) = open::that(&output_path) {
                    warn!(error = %e, "Could not open exported chart");
                }
            }
            Err(e) => {
                error!(error = %e, "Chart export failed");
                self.control_panel
                    .set_status(&format!("Error: {}", e));
            }
        }
    }

    fn show_active_tab(&mut self, ui: &mut egui::Ui) {
        let Some(data) = self.data.clone() else {
            ChartViewer::show_empty(ui);
            return;
        };

        match self.chart_viewer.active_tab {
            DashboardTab::TopDistricts => {
                self.control_panel.top_n_slider(ui);
                ui.add_space(8.0);

                let top_n = self.control_panel.settings.top_n;
                let top = Aggregator::top_districts(&data.migrants, top_n);
                ChartViewer::show_top_districts(ui, &top, top_n);
            }
            DashboardTab::ExchangeRate => {
                self.control_panel.year_range_sliders(ui);
                ui.add_space(8.0);

                let range = self.control_panel.settings.year_range;
                let series = Aggregator::filter_year_range(&self.yearly, range);
                let summary = SeriesSummary::compute(&series);
                ChartViewer::show_exchange_rate(ui, &series, summary.as_ref());
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action =
                        self.control_panel
                            .show(ui, self.is_loading, self.data.is_some());

                    match action {
                        ControlPanelAction::BrowseMigrants => {
                            self.handle_browse(InputFile::Migrants)
                        }
                        ControlPanelAction::BrowseRates => self.handle_browse(InputFile::Rates),
                        ControlPanelAction::Reload => self.start_load(true),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - tabs and charts
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show_tabs(ui);
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_active_tab(ui));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ExchangeRatePoint, MigrantRecord};
    use std::sync::mpsc::Sender;

    fn loaded_app() -> DashboardApp {
        let mut app = DashboardApp::with_config(DashboardConfig::default());
        app.apply_data(Arc::new(CleanedData {
            migrants: vec![MigrantRecord::new("Beirut", [1, 2, 3, 4, 5, 6, 7])],
            count_columns: Vec::new(),
            exchange_rates: vec![
                ExchangeRatePoint { year: 2019.0, value: 1507.5 },
                ExchangeRatePoint { year: 2021.0, value: 3900.0 },
            ],
        }));
        app
    }

    fn pending_load(app: &mut DashboardApp) -> Sender<LoadResult> {
        let (tx, rx) = channel();
        app.load_rx = Some(rx);
        app.is_loading = true;
        tx
    }

    #[test]
    fn test_apply_data_sets_year_bounds() {
        let app = loaded_app();

        assert!(app.data.is_some());
        assert_eq!(app.yearly.len(), 2);
        assert_eq!(app.control_panel.year_bounds, Some((2019, 2021)));
        assert!(app.control_panel.status.starts_with("Loaded"));
    }

    #[test]
    fn test_failed_load_clears_previous_data() {
        let mut app = loaded_app();
        let tx = pending_load(&mut app);
        let paths = app.current_paths();
        tx.send(LoadResult::Error {
            paths,
            message: "missing column".to_string(),
        })
        .unwrap();

        app.check_load_results();

        assert!(!app.is_loading);
        assert!(app.data.is_none());
        assert!(app.yearly.is_empty());
        assert_eq!(app.control_panel.year_bounds, None);
        assert_eq!(app.control_panel.status, "Error: missing column");
    }

    #[test]
    fn test_stopped_loader_clears_previous_data() {
        let mut app = loaded_app();
        drop(pending_load(&mut app));

        app.check_load_results();

        assert!(!app.is_loading);
        assert!(app.data.is_none());
        assert!(app.control_panel.status.contains("Error"));
    }

    #[test]
    fn test_pending_load_keeps_waiting() {
        let mut app = loaded_app();
        let _tx = pending_load(&mut app);

        app.check_load_results();

        assert!(app.is_loading);
        assert!(app.load_rx.is_some());
        assert!(app.data.is_some());
    }
}
