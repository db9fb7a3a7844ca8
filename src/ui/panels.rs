use std::time::Instant;

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::loader::FILE_FILTERS;
use crate::error::AnalyzerError;
use crate::export::EguiClipboard;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: file, column picker, mean, copy.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let columns: Vec<String> = state
            .column_counts
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        let current = state.active_column().unwrap_or("Select column").to_string();
        ui.add_enabled_ui(!columns.is_empty(), |ui: &mut Ui| {
            egui::ComboBox::from_id_salt("column_picker")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            choose_column(state, col);
                        }
                    }
                });
        });

        ui.separator();
        ui.label(state.mean().to_string());

        if ui.button("Copy result").clicked() {
            let ctx = ui.ctx().clone();
            state.copy_mean(&mut EguiClipboard(&ctx), Instant::now());
        }

        if let Some(hint) = state.hint.current() {
            let label = ui.label(RichText::new(hint.text).color(color::hint_color(hint.tone)));
            if let Some(detail) = &hint.detail {
                label.on_hover_text(detail);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – column overview and selection details
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    if let Some(name) = state.source_path.as_ref().and_then(|p| p.file_name()) {
        ui.label(name.to_string_lossy().into_owned());
    }
    ui.separator();

    if state.column_counts.is_empty() {
        ui.label("No table loaded.");
        return;
    }

    let active = state.active_column().map(str::to_string);
    let mut clicked: Option<String> = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Name");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Valid");
            });
        })
        .body(|mut body| {
            for (name, count) in &state.column_counts {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        let is_active = active.as_deref() == Some(name.as_str());
                        if ui.selectable_label(is_active, name).clicked() {
                            clicked = Some(name.clone());
                        }
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(count.to_string());
                    });
                });
            }
        });

    if let Some(name) = clicked {
        choose_column(state, &name);
    }

    ui.separator();
    ui.strong("Selection");

    let Some(session) = &state.session else {
        ui.label("No column plotted.");
        return;
    };
    ui.label(format!("{} valid values", session.column.len()));
    match &session.selection {
        Some(sel) => {
            ui.label(format!("Range: [{}, {}]", sel.start(), sel.end()));
            ui.label(format!("Points: {}", sel.count()));
        }
        None => {
            ui.label("Too few points to select a range.");
        }
    }
    ui.label(format!("Edge tolerance: {} samples", session.drag.tolerance()));
}

// ---------------------------------------------------------------------------
// Column switching
// ---------------------------------------------------------------------------

fn choose_column(state: &mut AppState, name: &str) {
    match state.select_column(name) {
        Ok(()) => {}
        Err(e @ AnalyzerError::EmptyColumn { .. }) => {
            log::warn!("{e}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("Warning")
                .set_description(e.to_string())
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
        Err(e) => {
            log::error!("{e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Open table file");
    for (label, extensions) in FILE_FILTERS {
        dialog = dialog.add_filter(*label, *extensions);
    }
    dialog = dialog.add_filter("All files", &["*"]);

    let Some(path) = dialog.pick_file() else {
        return;
    };

    match crate::data::loader::load_file(&path) {
        Ok(table) => {
            log::info!(
                "Loaded {} rows with columns {:?}",
                table.len(),
                table.column_names
            );
            if table.is_empty() {
                log::warn!("{} has a header but no data rows", path.display());
            }
            state.set_table(table, path);
        }
        Err(e) => {
            let err = AnalyzerError::file_read(&path, &e);
            log::error!("{err}");
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Failed to read file")
                .set_description(err.to_string())
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }
}
