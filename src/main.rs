mod app;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use app::EnergyDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_args();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "At Home – Hourly Energy Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(EnergyDashboardApp::new(&config)))),
    )
}
