//! Dark dashboard theme and tree palette

use crate::core::{Hsl, LinkStyle, Status};
use egui::{Color32, Stroke};

pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(10, 10, 12);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(22, 22, 26);
    pub const BG_HOVER: Color32 = Color32::from_rgb(34, 34, 40);
    /// Floating panels (tooltip, details, legend)
    pub const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(20, 20, 24, 220);

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(235, 235, 235);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(90, 90, 90);
    /// Slot labels drawn on top of the support fill
    pub const TEXT_ON_NODE: Color32 = Color32::from_rgb(15, 15, 15);

    pub const BORDER: Color32 = Color32::from_rgb(48, 48, 56);

    // === Tree ===
    pub const LINK_DEFAULT: Color32 = Color32::from_rgb(110, 110, 120);
    pub const LINK_CANONICAL: Color32 = Color32::from_rgb(80, 160, 230);
    pub const NODE_STROKE: Color32 = Color32::from_rgb(30, 30, 30);
    pub const NODE_ROOT_STROKE: Color32 = Color32::from_rgb(245, 245, 245);
    pub const NODE_PINNED: Color32 = Color32::from_rgb(250, 200, 60);

    // === Status ===
    pub const OK: Color32 = Color32::from_rgb(100, 200, 100);
    pub const PENDING: Color32 = Color32::from_rgb(200, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(200, 100, 100);
}

pub fn hsl_color(hsl: Hsl) -> Color32 {
    let [r, g, b] = hsl.to_rgb();
    Color32::from_rgb(r, g, b)
}

pub fn link_stroke(style: LinkStyle, scale: f32) -> Stroke {
    match style {
        LinkStyle::Default => Stroke::new(1.5 * scale, colors::LINK_DEFAULT),
        LinkStyle::Canonical => Stroke::new(3.0 * scale, colors::LINK_CANONICAL),
    }
}

/// Glyph outline: finalized blocks get a heavier border, the root a light one
pub fn node_stroke(status: Status, root: bool, scale: f32) -> Stroke {
    let color = if root {
        colors::NODE_ROOT_STROKE
    } else {
        colors::NODE_STROKE
    };
    let width = match status {
        Status::Final => 2.5,
        Status::Justified => 1.75,
        Status::Pending => 1.0,
    };
    Stroke::new(width * scale, color)
}

/// Dark egui visuals with flat panels
pub fn dashboard_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_ELEVATED;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_ELEVATED;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PRIMARY;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_ELEVATED;
    visuals.widgets.inactive.weak_bg_fill = BG_ELEVATED;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER);

    visuals.widgets.hovered.bg_fill = BG_HOVER;
    visuals.widgets.hovered.weak_bg_fill = BG_HOVER;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, TEXT_MUTED);

    visuals.widgets.active.bg_fill = BG_HOVER;
    visuals.widgets.active.weak_bg_fill = BG_HOVER;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, TEXT_SECONDARY);

    visuals.selection.bg_fill = Color32::from_rgb(40, 70, 100);
    visuals.selection.stroke = Stroke::new(1.0, TEXT_PRIMARY);

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
