use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::{DashboardConfig, DashboardView};
use crate::data::cache::LoadCache;
use crate::data::derive::DailyWindow;
use crate::data::filter::Selection;
use crate::data::loader::{DataSources, LoadOutcome};
use crate::data::pipeline::{self, ViewState};
use crate::ui::range::RangeControl;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Shared memo of loaded sources.
    pub cache: Arc<LoadCache>,

    /// Files currently shown.
    pub sources: DataSources,

    /// Last successful load (None until a load succeeds).
    pub outcome: Option<Arc<LoadOutcome>>,

    /// Which dashboard is active.
    pub view: DashboardView,

    /// Zone / building selection of the climate view.
    pub selection: Selection,

    /// Building picked in the hourly view.
    pub hourly_building: Option<String>,

    /// Filter / derive result for the active view (recomputed on interaction).
    pub view_state: Option<ViewState>,

    /// Per-building line colours.
    pub color_map: ColorMap,

    /// Chart time window.
    pub range: RangeControl,

    /// Morning shading band for the EUI chart.
    pub shading: DailyWindow,

    /// Rows shown in the hourly preview table.
    pub preview_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Non-fatal load warnings shown in the UI.
    pub warnings: Vec<String>,

    /// Confirmation of the last export.
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig, cache: Arc<LoadCache>) -> Self {
        let shading = config.daily_window().unwrap_or_else(|e| {
            log::error!("Invalid shading window, using default: {e:#}");
            DailyWindow::default()
        });
        Self {
            cache,
            sources: config.sources(),
            outcome: None,
            view: config.initial_view,
            selection: Selection::default(),
            hourly_building: None,
            view_state: None,
            color_map: ColorMap::default(),
            range: RangeControl::default(),
            shading,
            preview_rows: config.preview_rows,
            status_message: None,
            warnings: Vec::new(),
            notice: None,
        }
    }

    /// Load (through the cache) and rerun the pipeline for the active view.
    /// Called after every interaction.
    pub fn refresh(&mut self) {
        match self.cache.get_or_load(&self.sources) {
            Ok(outcome) => {
                let changed = self
                    .outcome
                    .as_ref()
                    .map_or(true, |old| !Arc::ptr_eq(old, &outcome));
                if changed {
                    self.adopt(&outcome);
                }
                self.outcome = Some(outcome);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.status_message = Some(format!("Error loading data: {e}"));
                self.outcome = None;
                self.view_state = None;
                self.warnings.clear();
                return;
            }
        }
        self.rerun_pipeline();
    }

    /// Reset per-dataset state after a new outcome arrives.
    fn adopt(&mut self, outcome: &LoadOutcome) {
        let table = &outcome.table;
        log::info!(
            "Showing {} rows, {} buildings, {} climate zones",
            table.len(),
            table.buildings.len(),
            table.climate_zones.len()
        );
        self.color_map = ColorMap::new(&table.buildings);
        self.selection.retain_known(table);
        if !self
            .hourly_building
            .as_ref()
            .is_some_and(|b| table.buildings.contains(b))
        {
            self.hourly_building = table.buildings.first().cloned();
        }
        self.warnings = outcome.warnings.iter().map(|w| w.to_string()).collect();
    }

    fn rerun_pipeline(&mut self) {
        let Some(outcome) = &self.outcome else {
            self.view_state = None;
            return;
        };
        let selection = match self.view {
            DashboardView::Hourly => match &self.hourly_building {
                Some(b) => Selection::single_building(b),
                None => {
                    self.view_state = Some(ViewState::NoData);
                    return;
                }
            },
            DashboardView::Climate => self.selection.clone(),
        };
        self.view_state = Some(pipeline::run(outcome, &selection, self.shading));
    }

    pub fn set_view(&mut self, view: DashboardView) {
        if self.view != view {
            self.view = view;
            self.refresh();
        }
    }

    pub fn set_primary(&mut self, path: PathBuf) {
        self.sources.primary = path;
        self.refresh();
    }

    pub fn set_reference(&mut self, path: Option<PathBuf>) {
        self.sources.reference = path;
        self.refresh();
    }

    /// Drop the cached load so the next refresh reads the files again.
    pub fn force_reload(&mut self) {
        self.cache.invalidate(&self.sources);
        self.refresh();
    }

    pub fn select_hourly_building(&mut self, building: String) {
        self.hourly_building = Some(building);
        self.refresh();
    }

    pub fn toggle_zone(&mut self, zone: &str) {
        self.selection.toggle_zone(zone);
        self.refresh();
    }

    pub fn toggle_building(&mut self, building: &str) {
        self.selection.toggle_building(building);
        self.refresh();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.refresh();
    }

    /// Record the result of a CSV export in the status line.
    pub fn record_export(&mut self, result: anyhow::Result<PathBuf>) {
        match result {
            Ok(path) => {
                self.notice = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.notice = None;
                self.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
