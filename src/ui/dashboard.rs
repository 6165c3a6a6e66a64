use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardView;
use crate::data::pipeline::ViewState;
use crate::export::{ALL_SCOPE, FILTERED_SCOPE};
use crate::state::AppState;
use crate::ui::panels::save_rows_dialog;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active dashboard in the central panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.outcome.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an hourly energy file to begin  (File → Open data file…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.view {
            DashboardView::Hourly => hourly_dashboard(ui, state),
            DashboardView::Climate => climate_dashboard(ui, state),
        });
}

/// Single-building view: data preview, one energy chart, downloads.
fn hourly_dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("At Home – Hourly Energy Analysis");

    let Some(outcome) = state.outcome.clone() else {
        return;
    };
    let table = &outcome.table;

    egui::CollapsingHeader::new("Data preview")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            table::preview_table(ui, table.head(state.preview_rows), table.has_reference);
        });

    let mut export = None;
    if ui.button("📥 Download All Data").clicked() {
        export = save_rows_dialog(ALL_SCOPE, &table.rows, table.has_reference);
    }
    ui.separator();

    let building = state.hourly_building.clone().unwrap_or_default();
    match &state.view_state {
        Some(ViewState::Ready(view)) => {
            ui.heading(format!("Hourly Energy Use – {building}"));
            plot::range_controls(ui, &mut state.range);
            plot::energy_plot(ui, "hourly_plot", &view.filtered.rows, &state.color_map, &state.range);

            if ui.button(format!("📥 Download {building} Data")).clicked() {
                export = save_rows_dialog(&building, &view.filtered.rows, table.has_reference);
            }
        }
        Some(ViewState::NoData) => {
            ui.label(RichText::new("No data for the selected building.").color(Color32::YELLOW));
        }
        None => {}
    }

    if let Some(result) = export {
        state.record_export(result);
    }
}

/// Multi-building view: energy and EUI charts, summary metrics, download.
fn climate_dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Hourly Energy by Climate Zone");

    for warning in &state.warnings {
        ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::YELLOW));
    }

    plot::range_controls(ui, &mut state.range);

    let has_reference = state
        .outcome
        .as_ref()
        .is_some_and(|o| o.table.has_reference);
    let mut export = None;

    match &state.view_state {
        Some(ViewState::Ready(view)) => {
            ui.strong("Hourly energy");
            plot::energy_plot(ui, "climate_energy_plot", &view.filtered.rows, &state.color_map, &state.range);

            ui.add_space(8.0);
            ui.strong(format!(
                "Energy use intensity  (shaded: {} – {})",
                state.shading.start.format("%H:%M"),
                state.shading.end.format("%H:%M")
            ));
            plot::eui_plot(ui, &view.eui, &view.shading, &state.color_map, &state.range);

            ui.add_space(8.0);
            ui.strong("Load summary");
            if view.summary.is_empty() {
                ui.label("No climate reference rows for the buildings in view.");
            } else {
                table::summary_table(ui, &view.summary);
            }

            ui.add_space(8.0);
            if ui.button("📥 Download Filtered Data").clicked() {
                export = save_rows_dialog(FILTERED_SCOPE, &view.filtered.rows, has_reference);
            }
        }
        Some(ViewState::NoData) => {
            ui.label(RichText::new("No data for the selected filters.").color(Color32::YELLOW));
        }
        None => {}
    }

    if let Some(result) = export {
        state.record_export(result);
    }
}
