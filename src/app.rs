use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ListingsApp {
    pub state: AppState,
}

impl ListingsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ListingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: listings table ----
        egui::TopBottomPanel::bottom("listings_table")
            .default_height(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::listings_table(ui, &self.state);
            });

        // ---- Central panel: KPIs, charts, map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &self.state);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let caps = state.dataset.capabilities;

    ui.heading("Listings Insights Dashboard");
    ui.add_space(6.0);
    panels::kpi_row(ui, state);
    ui.add_space(10.0);

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Price Distribution");
        plot::price_histogram(&mut cols[0], state);

        if caps.has_room_type {
            cols[1].strong("Room Type Breakdown");
            plot::room_type_pie(&mut cols[1], state);
        }
    });

    if caps.has_geo {
        ui.add_space(10.0);
        ui.strong("Listings Map");
        plot::listings_map(ui, state);
    }
}
