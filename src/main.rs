mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use eframe::egui;
use state::AppState;

/// Contract path of the appointments export; a CLI argument overrides it.
const DEFAULT_DATA_PATH: &str = "GSC cleaned.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GSC Analytics – Appointment Dashboard",
        options,
        Box::new(move |_cc| {
            let mut state = AppState::default();
            state.load_path(&path);
            Ok(Box::new(DashboardApp::new(state)))
        }),
    )
}
