mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::MovieDashboardApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = DashboardConfig::parse();

    // Nothing can be shown without a table, so a failed load ends the program.
    let table = data::loader::load_file(&config.data)
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))
        .with_context(|| format!("cannot start without a dataset ({})", config.data.display()))?;
    let source = config.data.clone();
    let state = AppState::new(config, table, source);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Movie Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(MovieDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
