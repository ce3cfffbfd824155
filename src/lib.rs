//! Fork-choice tree visualizer
//!
//! Polls a beacon-node fork-choice snapshot and displays the block tree:
//! - Tree (tidy) or cluster (dendrogram) layout, support-colored glyphs
//! - Hover tooltips, click-to-pin block details, pan/zoom
//! - Pausable auto-refresh; headless SVG export from the CLI

pub mod config;
pub mod core;
pub mod fetch_state;

#[cfg(any(not(target_arch = "wasm32"), feature = "wasm"))]
pub mod clock;

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod fetch_native;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod fetch_wasm;

#[cfg(feature = "gui")]
pub mod theme;

#[cfg(any(
    all(feature = "native", not(target_arch = "wasm32")),
    all(feature = "wasm", target_arch = "wasm32")
))]
pub mod app;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web {
    use crate::app::ForkChoiceApp;
    use crate::fetch_wasm::browser_config;
    use tracing::error;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async {
            let canvas = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("canvas"))
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            let Some(canvas) = canvas else {
                error!("No <canvas id=\"canvas\"> element on the page");
                return;
            };

            let config = browser_config();
            let started = eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(ForkChoiceApp::new(cc, config)))),
                )
                .await;
            if let Err(e) = started {
                error!(?e, "Failed to start eframe");
            }
        });
    }
}
