//! Trade Dashboard - Imports & Exports Dataset Viewer
//!
//! Opens the interactive dashboard, or with `--headless` runs the pipeline
//! once and writes the CSV export and chart images.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use trade_dashboard::cli::Args;
use trade_dashboard::config::DashboardConfig;
use trade_dashboard::gui::DashboardApp;
use trade_dashboard::headless;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;

    if args.headless {
        let report = headless::run(&config, &args)?;
        print!("{}", report.summary);
        println!(
            "\nWrote {} rows to {} and {} charts to {}",
            report.exported_rows,
            config.export_path.display(),
            report.charts.len(),
            config.chart_dir.display()
        );
        return Ok(());
    }

    log::info!("Starting dashboard with {}", config.data_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Imports and Exports Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Trade Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
