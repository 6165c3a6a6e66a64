use std::sync::Arc;

use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::cache::LoadCache;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EnergyDashboardApp {
    pub state: AppState,
}

impl EnergyDashboardApp {
    /// Build the app and run the first load from the configured files.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config, Arc::new(LoadCache::new()));
        state.refresh();
        Self { state }
    }
}

impl eframe::App for EnergyDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selections ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard::central_panel(ui, &mut self.state);
        });
    }
}
