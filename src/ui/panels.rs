use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            price_filter(ui, state);
            ui.separator();

            // No room type column → no room type filter.
            if state.dataset.capabilities.has_room_type {
                room_type_filter(ui, state);
            }
        });
}

fn price_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Price range");

    let bounds = state.dataset.price_bounds;
    let range = bounds.min..=bounds.max;
    let mut min = state.criteria.price_range.min;
    let mut max = state.criteria.price_range.max;

    let min_changed = ui
        .add(
            egui::Slider::new(&mut min, range.clone())
                .step_by(1.0)
                .prefix("$")
                .text("min"),
        )
        .changed();
    let max_changed = ui
        .add(
            egui::Slider::new(&mut max, range)
                .step_by(1.0)
                .prefix("$")
                .text("max"),
        )
        .changed();

    if min_changed {
        state.set_min_price(min);
    }
    if max_changed {
        state.set_max_price(max);
    }
}

fn room_type_filter(ui: &mut Ui, state: &mut AppState) {
    let all_types: Vec<String> = state.dataset.room_types.iter().cloned().collect();
    let header_text = format!(
        "Room type  ({}/{})",
        state.criteria.room_types.len(),
        all_types.len()
    );

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("room_type_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_room_types();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_room_types();
                }
            });

            for room_type in &all_types {
                let mut checked = state.criteria.room_types.contains(room_type);
                let color = state.room_type_colors.color_for(room_type);
                let changed = ui
                    .horizontal(|ui: &mut Ui| {
                        swatch(ui, color);
                        ui.checkbox(&mut checked, room_type.as_str()).changed()
                    })
                    .inner;
                if changed {
                    state.toggle_room_type(room_type);
                }
            }

            if state.criteria.room_types.is_empty() {
                ui.weak("Nothing selected: every room type is shown.");
            }
        });
}

/// Small filled circle used as a legend key.
pub fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    ui.painter().circle_filled(rect.center(), 5.0, color);
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// Listing count and average price of the filtered view.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    let average = state
        .view
        .average_price
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    ui.columns(2, |cols: &mut [Ui]| {
        kpi_card(&mut cols[0], "Total Listings", state.view.count.to_string());
        kpi_card(&mut cols[1], "Avg. Price", average);
    });
}

fn kpi_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(label);
        ui.label(RichText::new(value).size(28.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export filtered CSV…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} listings loaded, {} visible",
            state.dataset.len(),
            state.view.count
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered listings")
        .set_file_name("filtered_listings.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::save_filtered_csv(&state.dataset, &state.view, &path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
