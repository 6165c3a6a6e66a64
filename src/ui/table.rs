use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{
    AREA_COL, BUILDING_COL, CombinedRecord, ENERGY_COL, REF_BASE_COL, REF_PEAK_COL, REF_ZONE_COL,
    TIMESTAMP_COL,
};
use crate::data::summary::BuildingMetrics;
use crate::data::timestamp::format_timestamp;

const ROW_HEIGHT: f32 = 18.0;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_default()
}

/// First rows of the combined table (the data preview).
pub fn preview_table(ui: &mut Ui, rows: &[CombinedRecord], with_reference: bool) {
    let mut headers = vec![BUILDING_COL, TIMESTAMP_COL, ENERGY_COL, AREA_COL];
    if with_reference {
        headers.extend([REF_ZONE_COL, REF_PEAK_COL, REF_BASE_COL]);
    }

    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(80.0), headers.len())
            .header(20.0, |mut header| {
                for name in &headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        let mut cells = vec![
                            row.building.clone(),
                            format_timestamp(&row.timestamp),
                            format!("{:.3}", row.energy_kwh),
                            cell(row.area),
                        ];
                        if with_reference {
                            cells.push(row.climate_zone.clone().unwrap_or_default());
                            cells.push(cell(row.peak_load));
                            cells.push(cell(row.base_load));
                        }
                        for text in cells {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
}

/// Summary metrics, one row per building.
pub fn summary_table(ui: &mut Ui, summary: &[BuildingMetrics]) {
    const HEADERS: [&str; 5] = ["Building", "Peak load", "Base load", "Base-to-peak ratio", "Area"];

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(90.0), HEADERS.len())
            .header(20.0, |mut header| {
                for name in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for metrics in summary {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(&metrics.building);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(cell(metrics.peak_load));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(cell(metrics.base_load));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(metrics.base_to_peak.to_string());
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(cell(metrics.area));
                        });
                    });
                }
            });
    });
}
