mod app;
mod color;
mod config;
mod data;
mod selection;
mod state;
mod ui;

use std::path::PathBuf;

use app::ThermoscopeApp;
use config::ChartConfig;
use eframe::egui;
use state::AppState;

/// Usage: `thermoscope [DATASET] [CONFIG.json]`
fn main() -> eframe::Result {
    env_logger::init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let dataset_path = args.next();
    let config_path = args.next();

    let config = match config_path {
        Some(path) => ChartConfig::from_file(&path).unwrap_or_else(|e| {
            log::error!("Falling back to default config: {e:#}");
            ChartConfig::default()
        }),
        None => ChartConfig::default(),
    };

    let mut state = AppState::new(config);
    if let Some(path) = dataset_path {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Thermoscope – Surface Temperature Change",
        options,
        Box::new(|_cc| Ok(Box::new(ThermoscopeApp::new(state)))),
    )
}
