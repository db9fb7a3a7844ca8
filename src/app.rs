use std::time::Instant;

use eframe::egui;

use crate::config::AnalyzerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WaveMeanApp {
    pub state: AppState,
}

impl WaveMeanApp {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for WaveMeanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Expire the copy hint, and wake up again when the current one is due.
        if let Some(remaining) = self.state.tick(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }

        // ---- Top panel: file, column, mean, copy ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: columns and selection details ----
        egui::SidePanel::left("column_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: waveform ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::waveform_plot(ui, &mut self.state);
        });
    }
}
