use eframe::egui::{self, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints, Polygon};

use crate::color::{ColorMap, SHADING_FILL};
use crate::data::derive::{EuiDerivation, ShadingWindow};
use crate::data::model::{CombinedRecord, ENERGY_COL};
use crate::data::timestamp::{from_plot_x, to_plot_x};
use crate::ui::range::{RangeControl, RangePreset, y_extent};

const PLOT_HEIGHT: f32 = 360.0;

/// One named line of a time-series chart.
pub struct Series {
    pub name: String,
    pub color: egui::Color32,
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Series builders
// ---------------------------------------------------------------------------

/// One energy line per building; `rows` are sorted by building already.
pub fn energy_series(rows: &[CombinedRecord], colors: &ColorMap) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for row in rows {
        let point = [to_plot_x(&row.timestamp), row.energy_kwh];
        match series.last_mut() {
            Some(s) if s.name == row.building => s.points.push(point),
            _ => series.push(Series {
                name: row.building.clone(),
                color: colors.color_for(&row.building),
                points: vec![point],
            }),
        }
    }
    series
}

pub fn eui_series(eui: &EuiDerivation, colors: &ColorMap) -> Vec<Series> {
    eui.series
        .iter()
        .map(|(building, points)| Series {
            name: building.clone(),
            color: colors.color_for(building),
            points: points
                .iter()
                .map(|p| [to_plot_x(&p.timestamp), p.eui])
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Range selector
// ---------------------------------------------------------------------------

/// Preset buttons plus the slider that scrolls the window.
pub fn range_controls(ui: &mut Ui, range: &mut RangeControl) {
    ui.horizontal(|ui: &mut Ui| {
        for preset in RangePreset::ALL {
            if ui
                .selectable_label(range.preset == preset, preset.label())
                .clicked()
            {
                range.preset = preset;
            }
        }
        if range.preset != RangePreset::All {
            ui.separator();
            ui.add(
                egui::Slider::new(&mut range.position, 0.0..=1.0)
                    .show_value(false)
                    .text("scroll"),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Time-series chart
// ---------------------------------------------------------------------------

/// Render a line chart over a timestamp axis.
///
/// With a preset other than `All` the x-range is pinned to the slider window;
/// otherwise the plot auto-fits and zoom/drag are free.
pub fn time_series_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    series: &[Series],
    shading: &[ShadingWindow],
    range: &RangeControl,
) {
    let all_points = || series.iter().flat_map(|s| s.points.iter());
    let first = all_points().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let last = all_points().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    let window = range.visible_window(first, last);
    let full_y = y_extent(all_points(), first, last);

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Timestamp")
        .y_axis_label(y_label)
        .x_axis_formatter(|mark, _range| {
            from_plot_x(mark.value)
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|name, value| {
            let when = from_plot_x(value.x)
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            if name.is_empty() {
                format!("{when}\n{:.3}", value.y)
            } else {
                format!("{name}\n{when}\n{:.3}", value.y)
            }
        })
        .allow_boxed_zoom(window.is_none())
        .allow_drag(window.is_none())
        .allow_scroll(window.is_none())
        .allow_zoom(window.is_none())
        .show(ui, |plot_ui| {
            if let Some((x0, x1)) = window {
                let (y0, y1) = y_extent(all_points(), x0, x1).unwrap_or((0.0, 1.0));
                let pad = ((y1 - y0) * 0.05).max(1e-6);
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0 - pad], [x1, y1 + pad]));
            }

            if let Some((y0, y1)) = full_y {
                for w in shading {
                    let (sx, ex) = (to_plot_x(&w.start), to_plot_x(&w.end));
                    let rect = vec![[sx, y0], [ex, y0], [ex, y1], [sx, y1]];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(rect))
                            .fill_color(SHADING_FILL)
                            .stroke(Stroke::NONE),
                    );
                }
            }

            for s in series {
                let line = Line::new(PlotPoints::from(s.points.clone()))
                    .name(&s.name)
                    .color(s.color)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}

/// Hourly energy chart, one line per building in `rows`.
pub fn energy_plot(ui: &mut Ui, id: &str, rows: &[CombinedRecord], colors: &ColorMap, range: &RangeControl) {
    time_series_plot(ui, id, ENERGY_COL, &energy_series(rows, colors), &[], range);
}

/// EUI chart with the morning shading band on every date.
pub fn eui_plot(
    ui: &mut Ui,
    eui: &EuiDerivation,
    shading: &[ShadingWindow],
    colors: &ColorMap,
    range: &RangeControl,
) {
    if eui.series.is_empty() {
        ui.label("No building in this selection has complete area data.");
        return;
    }
    time_series_plot(ui, "eui_plot", "EUI (kWh / area)", &eui_series(eui, colors), shading, range);
}
