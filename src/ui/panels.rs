use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::SiteSelector;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selector controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Launch Records");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            site_selector(ui, state);
            ui.separator();

            payload_range(ui, state);
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset();
            }
            ui.separator();

            aggregate_table(ui, state);
        });
}

fn site_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Launch Site");

    let current = state.site().clone();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(site_label(&current))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.site_filter)
                    .hint_text("Select a Launch Site here"),
            );
            for option in state.filtered_site_options() {
                let label = site_label(&option);
                if ui.selectable_label(current == option, label).clicked() && current != option {
                    state.select_site(option);
                }
            }
        });
}

fn site_label(site: &SiteSelector) -> String {
    match site {
        SiteSelector::All => "All Sites".to_string(),
        SiteSelector::Site(s) => s.clone(),
    }
}

fn payload_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Payload range (Kg):");

    let bounds = state.slider_bounds();
    let step = state.payload_step;

    let low_changed = ui
        .add(
            Slider::new(&mut state.range_draft[0], bounds.clone())
                .step_by(step)
                .text("min"),
        )
        .changed();
    let high_changed = ui
        .add(Slider::new(&mut state.range_draft[1], bounds).step_by(step).text("max"))
        .changed();

    if low_changed || high_changed {
        state.commit_range_draft(low_changed);
    }

    ui.horizontal(|ui: &mut Ui| {
        for mark in state.slider_marks() {
            ui.label(RichText::new(format!("{mark:.0}")).small().weak());
        }
    });

    let range = state.range();
    ui.label(
        RichText::new(format!("{:.0} – {:.0} kg", range.low(), range.high()))
            .small()
            .weak(),
    );
}

/// The proportion chart's rows as a table.
fn aggregate_table(ui: &mut Ui, state: &AppState) {
    let key_header = match state.site() {
        SiteSelector::All => "Site",
        SiteSelector::Site(_) => "class",
    };

    ui.strong("Counts");
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(18.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong(key_header);
            });
            header.col(|ui: &mut Ui| {
                ui.strong("count");
            });
        })
        .body(|mut body| {
            for row in &state.pie.rows {
                body.row(18.0, |mut table_row| {
                    table_row.col(|ui: &mut Ui| {
                        ui.label(&row.group_key);
                    });
                    table_row.col(|ui: &mut Ui| {
                        ui.label(row.count.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export chart data…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches loaded, {} in scatter",
            state.dataset().len(),
            state.scatter.points.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart data")
        .add_filter("JSON", &["json"])
        .set_file_name("launch_charts.json")
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
