use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listings table (bottom panel)
// ---------------------------------------------------------------------------

/// Every listing of the filtered view, all columns in source order.
/// Rows are virtualised so large datasets stay responsive.
pub fn listings_table(ui: &mut Ui, state: &AppState) {
    let dataset = &state.dataset;
    let view = &state.view;

    ui.strong(format!("Listings ({})", view.count));

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(
                Column::auto().at_least(60.0).clip(true),
                dataset.columns.len(),
            )
            .header(20.0, |mut header| {
                for col in &dataset.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, view.indices.len(), |mut row| {
                    let record = &dataset.rows[view.indices[row.index()]];
                    for col in &dataset.columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(record.display_value(col));
                        });
                    }
                });
            });
    });
}
