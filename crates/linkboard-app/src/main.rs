//! Main application entry point.

mod app;

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting Linkboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1024.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Linkboard",
        options,
        Box::new(|_cc| Ok(Box::new(app::LinkboardApp::new()))),
    )
}
