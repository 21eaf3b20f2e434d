//! Migrant Dashboard - Districts & Exchange Rate Viewer
//!
//! Loads the migrant counts and exchange-rate CSV files and shows them in a
//! two-tab chart window.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use migrant_dashboard::config::DashboardConfig;
use migrant_dashboard::gui::DashboardApp;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Migrant counts & exchange rate dashboard")]
struct Args {
    /// CSV with migrant counts by district
    #[arg(long)]
    migrants: Option<PathBuf>,

    /// CSV with the yearly exchange-rate series
    #[arg(long)]
    rates: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(path) = args.migrants {
        config.migrants_path = path;
    }
    if let Some(path) = args.rates {
        config.rates_path = path;
    }

    info!(
        migrants = %config.migrants_path.display(),
        rates = %config.rates_path.display(),
        "Starting dashboard"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 820.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Migrant Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Migrant Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
