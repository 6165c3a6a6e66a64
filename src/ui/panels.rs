use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardView;
use crate::data::model::CombinedRecord;
use crate::export::{export_file_name, write_csv};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel for the active view.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(outcome) = state.outcome.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let table = &outcome.table;

    match state.view {
        DashboardView::Hourly => {
            ui.strong("Select Building");
            let current = state.hourly_building.clone().unwrap_or_default();
            let mut picked = None;
            egui::ComboBox::from_id_salt("hourly_building")
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for building in &table.buildings {
                        if ui.selectable_label(current == *building, building).clicked() {
                            picked = Some(building.clone());
                        }
                    }
                });
            if let Some(building) = picked {
                state.select_hourly_building(building);
            }
        }
        DashboardView::Climate => {
            if !table.has_reference {
                ui.label(
                    RichText::new("No climate file loaded (File → Open climate file…).")
                        .color(Color32::YELLOW),
                );
            }
            let zone_choices = table.climate_zones.clone();
            let building_choices = table.buildings_in_zones(&state.selection.zones);
            let mut toggled_zone = None;
            let mut toggled_building = None;

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    let header = format!(
                        "Climate zones  ({}/{})",
                        state.selection.zones.len(),
                        zone_choices.len()
                    );
                    egui::CollapsingHeader::new(RichText::new(header).strong())
                        .id_salt("zones")
                        .default_open(true)
                        .show(ui, |ui: &mut Ui| {
                            for zone in &zone_choices {
                                let mut checked = state.selection.zones.contains(zone);
                                if ui.checkbox(&mut checked, zone).changed() {
                                    toggled_zone = Some(zone.clone());
                                }
                            }
                        });

                    let header = format!(
                        "Buildings  ({}/{})",
                        state.selection.buildings.len(),
                        building_choices.len()
                    );
                    egui::CollapsingHeader::new(RichText::new(header).strong())
                        .id_salt("buildings")
                        .default_open(true)
                        .show(ui, |ui: &mut Ui| {
                            for building in &building_choices {
                                let mut checked = state.selection.buildings.contains(building);
                                let text = RichText::new(building)
                                    .color(state.color_map.color_for(building));
                                if ui.checkbox(&mut checked, text).changed() {
                                    toggled_building = Some(building.clone());
                                }
                            }
                        });
                });

            if let Some(zone) = toggled_zone {
                state.toggle_zone(&zone);
            }
            if let Some(building) = toggled_building {
                state.toggle_building(&building);
            }
            if ui.button("Clear selection").clicked() {
                state.clear_selection();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data file…").clicked() {
                if let Some(path) = pick_file("Open hourly energy data", &["csv", "parquet", "pq"]) {
                    state.set_primary(path);
                }
                ui.close_menu();
            }
            if ui.button("Open climate file…").clicked() {
                if let Some(path) = pick_file("Open climate-zone reference", &["csv"]) {
                    state.set_reference(Some(path));
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(state.sources.reference.is_some(), egui::Button::new("Remove climate file"))
                .clicked()
            {
                state.set_reference(None);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reload").clicked() {
                state.force_reload();
                ui.close_menu();
            }
        });

        ui.separator();

        for (view, label) in [
            (DashboardView::Hourly, "Hourly"),
            (DashboardView::Climate, "Climate zones"),
        ] {
            if ui.selectable_label(state.view == view, label).clicked() {
                state.set_view(view);
            }
        }

        ui.separator();

        if let Some(outcome) = &state.outcome {
            ui.label(format!(
                "{} rows, {} buildings",
                outcome.table.len(),
                outcome.table.buildings.len()
            ));
        }

        if !state.warnings.is_empty() {
            ui.separator();
            ui.label(
                RichText::new(format!("⚠ {} warning(s)", state.warnings.len()))
                    .color(Color32::YELLOW),
            )
            .on_hover_text(state.warnings.join("\n"));
        }

        if let Some(msg) = &state.notice {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::LIGHT_GREEN));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_file(title: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", extensions)
        .pick_file()
}

/// Ask for a destination and write `rows` as CSV.
/// Returns `None` when the user cancels the dialog.
pub fn save_rows_dialog(
    scope: &str,
    rows: &[CombinedRecord],
    with_reference: bool,
) -> Option<anyhow::Result<PathBuf>> {
    let path = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(export_file_name(scope))
        .add_filter("CSV", &["csv"])
        .save_file()?;

    Some(write_csv(&path, rows, with_reference).map(|()| {
        log::info!("Exported {} rows to {}", rows.len(), path.display());
        path
    }))
}
