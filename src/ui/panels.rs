use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_reload = state.source_path.is_some();
            if ui
                .add_enabled(can_reload, egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} appointments loaded, {} match filters",
                table.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the filter sidebar: date range pickers and staff selection.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No data loaded.");
        return;
    };
    let staff_names: Vec<String> = table.staff_names.iter().cloned().collect();

    // ---- Date range ----
    ui.strong("Date range");
    let mut dates_changed = false;
    if let Some(criteria) = state.criteria.as_mut() {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("From");
            if ui
                .add(DatePickerButton::new(&mut criteria.start).id_salt("start_date"))
                .changed()
            {
                dates_changed = true;
            }
        });
        ui.horizontal(|ui: &mut Ui| {
            ui.label("To");
            if ui
                .add(DatePickerButton::new(&mut criteria.end).id_salt("end_date"))
                .changed()
            {
                dates_changed = true;
            }
        });
    }
    if dates_changed {
        state.refilter();
    }
    if ui.small_button("Full span").clicked() {
        state.reset_date_range();
    }

    ui.separator();

    // ---- Staff selection ----
    let n_selected = state.criteria.as_ref().map_or(0, |c| c.staff.len());
    ui.strong(format!("Staff  ({n_selected}/{})", staff_names.len()));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_staff();
        }
        if ui.small_button("None").clicked() {
            state.select_no_staff();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in &staff_names {
                let selected = state
                    .criteria
                    .as_ref()
                    .is_some_and(|c| c.staff.contains(name.as_str()));
                let text =
                    RichText::new(name).color(state.staff_colors.color_for(name));
                let mut checked = selected;
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_staff(name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open appointment data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
