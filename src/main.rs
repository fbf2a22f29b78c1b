#![deny(warnings)]

//! Entry point for the Bernard desktop dashboard.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use bernard_dash::egui_app::controller::DashController;
use bernard_dash::egui_app::ui::EguiApp;
use bernard_dash::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 720.0])
        .with_min_inner_size([820.0, 520.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Bernard",
        native_options,
        Box::new(move |_cc| {
            let controller = DashController::from_env();
            tracing::info!("Dashboard started against {}", controller.base_url());
            Ok(Box::new(EguiApp::new(controller)))
        }),
    )?;
    Ok(())
}
