#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod demo;
mod views;

use app::SlidefigApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_title("slidefig"),
        ..Default::default()
    };

    eframe::run_native(
        "slidefig",
        options,
        Box::new(|_cc| Ok(Box::new(SlidefigApp::new()))),
    )
}
