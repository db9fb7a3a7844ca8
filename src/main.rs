mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod interaction;
mod selection;
mod state;
mod ui;

use app::WaveMeanApp;
use config::AnalyzerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AnalyzerConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    log::info!(
        "starting with default span {} and edge tolerance {}",
        config.default_span,
        config.edge_tolerance
    );

    eframe::run_native(
        "Wave Mean – Column Average Tool",
        options,
        Box::new(|_cc| Ok(Box::new(WaveMeanApp::new(config)))),
    )
}
