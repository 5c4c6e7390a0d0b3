mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use config::Config;
use data::loader::CsvDataProvider;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();
    log::debug!("{config:?}");

    let provider = CsvDataProvider::new(&config.data_dir);

    if config.report {
        let stdout = std::io::stdout();
        return report::run(&config, &provider, &mut stdout.lock());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let state = AppState::new(Box::new(provider));
    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
