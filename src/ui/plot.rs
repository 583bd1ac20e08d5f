use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::epaint::Mesh;
use eframe::egui::{self, Color32, Pos2, Shape, Ui, Vec2};
use egui_plot::{Bar, BarChart, Plot, Points};

use crate::config::{HISTOGRAM_BINS, HISTOGRAM_COLOR, MAP_POINT_COLOR};
use crate::data::stats;
use crate::state::AppState;
use crate::ui::panels::swatch;

// ---------------------------------------------------------------------------
// Price histogram
// ---------------------------------------------------------------------------

pub fn price_histogram(ui: &mut Ui, state: &AppState) {
    let bins = stats::price_histogram(&state.dataset, &state.view, HISTOGRAM_BINS);
    if bins.is_empty() {
        ui.label("No listings match the current filters.");
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width().max(1.0))
                .name(format!("${:.0} - ${:.0}", b.start, b.end))
        })
        .collect();

    let chart = BarChart::new(bars).color(HISTOGRAM_COLOR).name("Listings");

    Plot::new("price_histogram")
        .height(280.0)
        .x_axis_label("price")
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Room type pie
// ---------------------------------------------------------------------------

pub fn room_type_pie(ui: &mut Ui, state: &AppState) {
    let shares = stats::room_type_breakdown(&state.dataset, &state.view);
    if shares.is_empty() {
        ui.label("No room type data for the current filters.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let size = 240.0_f32.min(ui.available_width() * 0.5);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
        let painter = ui.painter_at(rect);

        // Slices start at 12 o'clock and run clockwise.
        let mut start = -FRAC_PI_2;
        for share in &shares {
            let sweep = share.fraction as f32 * TAU;
            let color = state.room_type_colors.color_for(&share.room_type);
            painter.add(pie_slice(rect.center(), size * 0.45, start, sweep, color));
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for share in &shares {
                ui.horizontal(|ui: &mut Ui| {
                    swatch(ui, state.room_type_colors.color_for(&share.room_type));
                    ui.label(format!(
                        "{}  {:.1}% ({})",
                        share.room_type,
                        share.fraction * 100.0,
                        share.count
                    ));
                });
            }
        });
    });
}

/// Triangle fan from the centre; works for slices wider than a half circle.
fn pie_slice(center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) -> Shape {
    let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as u32;
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    for i in 0..=steps {
        let angle = start + sweep * i as f32 / steps as f32;
        mesh.colored_vertex(center + radius * Vec2::angled(angle), color);
    }
    for i in 0..steps {
        mesh.add_triangle(0, i + 1, i + 2);
    }
    Shape::mesh(mesh)
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Scatter of the filtered listings by longitude / latitude.
pub fn listings_map(ui: &mut Ui, state: &AppState) {
    let points = stats::geo_points(&state.dataset, &state.view);
    if points.is_empty() {
        ui.colored_label(
            Color32::from_rgb(0xE0, 0xA0, 0x00),
            "⚠ No valid latitude/longitude data available.",
        );
        return;
    }

    let markers = Points::new(points)
        .radius(2.0)
        .color(MAP_POINT_COLOR)
        .name("Listings");

    Plot::new("listings_map")
        .height(380.0)
        .data_aspect(1.0)
        .x_axis_label("longitude")
        .y_axis_label("latitude")
        .show(ui, |plot_ui| plot_ui.points(markers));
}
