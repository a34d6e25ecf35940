use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::data::model::{Outcome, ScatterPoint};
use crate::state::AppState;

/// Segments used to approximate a full circle.
const PIE_SEGMENTS: usize = 128;

// ---------------------------------------------------------------------------
// Central panel: proportion chart above, scatter chart below
// ---------------------------------------------------------------------------

pub fn charts(ui: &mut Ui, state: &AppState) {
    let chart_height = ((ui.available_height() - 80.0) / 2.0).max(120.0);

    ui.heading(&state.pie.title);
    pie_chart(ui, state, chart_height);

    ui.separator();

    ui.heading(&state.scatter.title);
    scatter_chart(ui, state, chart_height);
}

// ---------------------------------------------------------------------------
// Proportion chart
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let rows = &state.pie.rows;
    let total: usize = rows.iter().map(|r| r.count).sum();

    if total == 0 {
        ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No launches match this site").italics());
            });
        });
        return;
    }

    let site = state.site();

    Plot::new("success_pie_chart")
        .height(height)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for row in rows {
                let color = state.slice_colors.color_for(site, &row.group_key);
                let fraction = row.count as f64 / total as f64;
                let end = start + fraction * TAU;

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(sector(start, end)))
                        .name(&row.group_key)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let mid = (start + end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    RichText::new(format!("{:.1}%", fraction * 100.0))
                        .color(Color32::BLACK)
                        .strong(),
                ));
                start = end;
            }
        });
}

/// Unit-circle sector from angle `start` to `end` (radians), as a closed polygon.
fn sector(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) / TAU) * PIE_SEGMENTS as f64).ceil().max(1.0) as usize;
    let arc = (0..=steps).map(|i| {
        let a = start + (end - start) * i as f64 / steps as f64;
        [a.cos(), a.sin()]
    });
    std::iter::once([0.0, 0.0]).chain(arc).collect()
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, state: &AppState, height: f32) {
    // Hover lookup needs its own copy of the points.
    let hover_points: Vec<ScatterPoint> = state.scatter.points.clone();

    Plot::new("success_payload_scatter_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| hover_label(&hover_points, name, value))
        .show(ui, |plot_ui| {
            for category in state.dataset().categories() {
                let points: Vec<[f64; 2]> = state
                    .scatter
                    .points
                    .iter()
                    .filter(|p| &p.booster_version_category == category)
                    .map(|p| [p.payload_mass_kg, p.outcome.as_class() as f64])
                    .collect();

                if points.is_empty() {
                    continue;
                }

                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(state.category_colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

/// Hover text: category, booster version and outcome of the launch closest
/// to the cursor within the hovered series.
fn hover_label(points: &[ScatterPoint], category: &str, value: &PlotPoint) -> String {
    let nearest = points
        .iter()
        .filter(|p| p.booster_version_category == category)
        .min_by(|a, b| distance(a, value).total_cmp(&distance(b, value)));

    match nearest {
        Some(p) => format!(
            "{category}\nBooster Version: {}\nPayload Mass (kg): {}\nclass: {}",
            p.booster_version, p.payload_mass_kg, p.outcome
        ),
        None => format!("Payload Mass (kg): {:.0}\nclass: {:.2}", value.x, value.y),
    }
}

fn distance(p: &ScatterPoint, value: &PlotPoint) -> f64 {
    let dy = match p.outcome {
        Outcome::Success => 1.0 - value.y,
        Outcome::Failure => value.y,
    };
    (p.payload_mass_kg - value.x).abs() + dy.abs() * 1000.0
}
