//! Ratatoskr Native
//!
//! A desktop frontend for the Ratatoskr chat and retrieval API.

mod api;
mod app;
mod controller;
mod error;
mod poll;
mod render;
mod report;
mod session;
mod settings;
#[cfg(test)]
mod testing;
mod theme;

use eframe::egui;
use settings::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Ratatoskr"),
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Ratatoskr",
        options,
        Box::new(|cc| Ok(Box::new(app::QueryApp::new(cc, settings)))),
    )
}
