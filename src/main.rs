//! CO2 Dashboard - Interactive Emission Data Explorer
//!
//! Loads a vehicle fuel-consumption / CO2-emission CSV, filters it from the
//! sidebar and shows three descriptive charts that follow the filters.

mod charts;
mod config;
mod data;
mod gui;
mod state;
mod stats;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load().context("Failed to load dashboard configuration")?;
    log::info!("Using dataset {}", config.data_path.display());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Data Analysis - CO2 Emission"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CO2 Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
