//! Fork-choice dashboard
//!
//! The egui app that runs on both native and WASM platforms. All state lives
//! in the core [`Session`]; this module only feeds it input and paints it.

mod canvas;
mod header;
mod panels;

use eframe::egui;

use crate::clock::{now_seconds, until};
use crate::config::Config;
use crate::core::{Session, Viewport};
use crate::fetch_state::FetchStatus;
use crate::theme::{colors, dashboard_visuals};

#[cfg(target_arch = "wasm32")]
use crate::fetch_wasm::WasmFetchClient;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use crate::fetch_native::NativeFetchClient;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

pub struct ForkChoiceApp {
    pub(crate) session: Session,

    #[cfg(target_arch = "wasm32")]
    source: WasmFetchClient,
    #[cfg(not(target_arch = "wasm32"))]
    source: NativeFetchClient,

    /// Top-left of the canvas in screen coordinates, for floating panels
    pub(crate) canvas_origin: egui::Pos2,
    pub(crate) show_legend: bool,
}

impl ForkChoiceApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        cc.egui_ctx.set_visuals(dashboard_visuals());

        let ctx = cc.egui_ctx.clone();
        #[cfg(target_arch = "wasm32")]
        let source = WasmFetchClient::new(&config, Rc::new(move || ctx.request_repaint()));
        #[cfg(not(target_arch = "wasm32"))]
        let source =
            NativeFetchClient::spawn_with_waker(&config, Arc::new(move || ctx.request_repaint()));

        tracing::info!(
            url = %config.data_url,
            interval_ms = config.refresh_interval.as_millis() as u64,
            "Dashboard started"
        );

        Self {
            session: Session::new(config.refresh_interval, Viewport::default()),
            source,
            canvas_origin: egui::Pos2::ZERO,
            show_legend: true,
        }
    }

    pub(crate) fn fetch_status(&self) -> FetchStatus {
        self.source.status()
    }

    pub(crate) fn toggle_auto_refresh(&mut self) {
        self.session
            .toggle_auto_refresh(now_seconds(), &mut self.source);
    }
}

impl eframe::App for ForkChoiceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = now_seconds();
        self.session.tick(now, &mut self.source);

        // Completions wake us through the fetch client; timer ticks need this
        if let Some(due) = self.session.next_fetch_due() {
            ctx.request_repaint_after(until(due, now));
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(6.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_canvas(ui);
            });

        self.draw_tooltip(ctx);
        self.draw_details(ctx);
        if self.show_legend {
            self.draw_legend(ctx);
        }
    }
}
