mod app;
mod app_dir;
mod app_state;
mod preferences;
mod render_bridge;
mod ui;

use eframe::egui;
use tracing::info;

use app::FractalLabApp;
use preferences::AppPreferences;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting FractalLab");

    let prefs = AppPreferences::load();

    // A share link (or just its query) may be passed as the first argument.
    let share_link = std::env::args().nth(1);
    if let Some(ref link) = share_link {
        info!(link = link.as_str(), "Opening share link");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Fractal Lab")
            .with_inner_size([prefs.window_width, prefs.window_height])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FractalLab",
        options,
        Box::new(move |cc| {
            egui_material_icons::initialize(&cc.egui_ctx);
            Ok(Box::new(FractalLabApp::new(
                &cc.egui_ctx,
                prefs,
                share_link.as_deref(),
            )))
        }),
    )
}
