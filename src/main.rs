#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod io;
mod logging;
mod model;
mod ui;

fn main() -> eframe::Result<()> {
    let settings = config::AppSettings::load();
    logging::init(settings.level_filter());
    log::info!(
        "starting Quake Time Window {} (quiet period {} ms)",
        env!("CARGO_PKG_VERSION"),
        settings.quiet_period_ms
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Quake Time Window"),
        ..Default::default()
    };

    eframe::run_native(
        "Quake Time Window",
        options,
        Box::new(|cc| Ok(Box::new(app::QuakeApp::new(cc, settings)))),
    )
}
