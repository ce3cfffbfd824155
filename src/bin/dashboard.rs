//! Native fork-choice dashboard window
//!
//! Run with: cargo run --features native --bin fcv

use fork_choice_vis::app::ForkChoiceApp;
use fork_choice_vis::config::Config;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fork_choice_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = Config::from_env()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Fork Choice")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fork Choice",
        options,
        Box::new(|cc| Ok(Box::new(ForkChoiceApp::new(cc, config)))),
    )?;
    Ok(())
}
