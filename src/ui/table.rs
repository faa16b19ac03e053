use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{AppointmentTable, COL_DSS, COL_STAFF, COL_STATEMENT, COL_TIMESTAMP};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Collapsible raw-data section at the bottom of the dashboard.
pub fn raw_data_section(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        return;
    };

    ui.toggle_value(&mut state.show_raw_data, "Show raw data");
    if !state.show_raw_data {
        return;
    }

    if state.visible_indices.is_empty() {
        ui.label("No rows to show.");
        return;
    }
    data_table(ui, &table, &state.visible_indices);
}

/// The filtered rows verbatim: contract columns first, then any passthrough
/// columns in header order.
fn data_table(ui: &mut Ui, table: &AppointmentTable, indices: &[usize]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .column(Column::auto().at_least(130.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder().at_least(160.0))
        .columns(Column::auto(), table.extra_columns.len())
        .header(20.0, |mut header| {
            for title in [COL_TIMESTAMP, COL_STAFF, COL_DSS, COL_STATEMENT] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
            for col in &table.extra_columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let rec = &table.records[indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.timestamp.format("%Y-%m-%d %H:%M").to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.staff_name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.dss_response.as_deref().unwrap_or("—"));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(rec.statement.as_deref().unwrap_or(""));
                });
                for col in &table.extra_columns {
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.extra.get(col).map(String::as_str).unwrap_or(""));
                    });
                }
            });
        });
}
