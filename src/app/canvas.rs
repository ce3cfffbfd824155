//! Tree canvas: paints the scene under the view transform and routes
//! pointer input (drag to pan, scroll/pinch to zoom, hover, click-to-pin)

use eframe::egui;
use egui::epaint::CubicBezierShape;
use egui::{Align2, FontId, Pos2, Sense, StrokeKind};

use crate::core::{Point, Scene, ViewTransform, Viewport};
use crate::theme::{colors, hsl_color, link_stroke, node_stroke};
use super::ForkChoiceApp;

/// Scroll pixels per e-fold of zoom
const SCROLL_ZOOM_SPEED: f64 = 1.0 / 400.0;
const LABEL_FONT_PX: f32 = 12.0;

impl ForkChoiceApp {
    pub(crate) fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        self.canvas_origin = rect.min;

        // Window resize: relayout the stored snapshot, never fetch
        self.session.resize(Viewport::new(
            rect.width().max(1.0) as f64,
            rect.height().max(1.0) as f64,
        ));

        let to_local = |p: Pos2| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64);

        if response.dragged() {
            let delta = response.drag_delta();
            self.session.pan(delta.x as f64, delta.y as f64);
        }

        if let Some(pos) = response.hover_pos() {
            let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            let factor = pinch as f64 * (scroll as f64 * SCROLL_ZOOM_SPEED).exp();
            if (factor - 1.0).abs() > f64::EPSILON {
                self.session.zoom_at(to_local(pos), factor);
            }
        }

        let pointer = if response.dragged() {
            None
        } else {
            response.hover_pos().map(to_local)
        };
        self.session.pointer_moved(pointer);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.click(to_local(pos));
            }
        }

        let transform = self.session.ui().view_transform;
        let scene = self.session.scene();
        if scene.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No fork-choice data",
                FontId::proportional(16.0),
                colors::TEXT_MUTED,
            );
            return;
        }
        let pinned = self
            .session
            .ui()
            .pinned
            .as_ref()
            .and_then(|p| scene.find(&p.0));
        paint_scene(&painter, scene, &transform, rect.min, pinned);
    }
}

fn paint_scene(
    painter: &egui::Painter,
    scene: &Scene,
    t: &ViewTransform,
    origin: Pos2,
    pinned: Option<crate::core::NodeId>,
) {
    let k = t.k as f32;
    let screen = |p: Point| {
        let q = t.apply(p);
        Pos2::new(origin.x + q.x as f32, origin.y + q.y as f32)
    };

    for link in &scene.links {
        let points = link.curve.map(screen);
        painter.add(CubicBezierShape::from_points_stroke(
            points,
            false,
            egui::Color32::TRANSPARENT,
            link_stroke(link.style, k),
        ));
    }

    for glyph in scene.painted() {
        let r = glyph.rect();
        let rect = egui::Rect::from_min_max(screen(r.min), screen(r.max));
        let corner = 2.0 * k;
        painter.rect_filled(rect, corner, hsl_color(glyph.fill));
        painter.rect_stroke(
            rect,
            corner,
            node_stroke(glyph.status, glyph.class.root, k),
            StrokeKind::Inside,
        );
        if pinned == Some(glyph.id) {
            painter.rect_stroke(
                rect.expand(2.0 * k),
                corner,
                egui::Stroke::new(2.0 * k, colors::NODE_PINNED),
                StrokeKind::Outside,
            );
        }
        if let Some(label) = &glyph.label {
            painter.text(
                screen(label.anchor),
                Align2::LEFT_BOTTOM,
                &label.text,
                FontId::monospace(LABEL_FONT_PX * k),
                colors::TEXT_ON_NODE,
            );
        }
    }
}
