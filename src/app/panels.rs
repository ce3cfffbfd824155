//! Floating panels: hover tooltip, pinned-block details, legend

use eframe::egui;
use crate::core::{Hsl, LinkStyle};
use crate::theme::{colors, hsl_color, link_stroke};
use super::ForkChoiceApp;

fn panel_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(colors::PANEL_FILL)
        .stroke(egui::Stroke::new(1.0, colors::BORDER))
        .corner_radius(4.0)
        .inner_margin(8.0)
}

impl ForkChoiceApp {
    pub(crate) fn draw_tooltip(&self, ctx: &egui::Context) {
        let Some(tooltip) = self.session.interaction().tooltip() else {
            return;
        };
        let at = tooltip.position();
        let pos = self.canvas_origin + egui::vec2(at.x as f32, at.y as f32);

        egui::Area::new(egui::Id::new("node_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(pos)
            .interactable(false)
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    for line in tooltip.lines() {
                        ui.label(egui::RichText::new(line).monospace());
                    }
                });
            });
    }

    /// Details of the pinned block, anchored top-right
    pub(crate) fn draw_details(&self, ctx: &egui::Context) {
        let Some(panel) = self.session.interaction().panel() else {
            return;
        };

        egui::Area::new(egui::Id::new("details_area"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 44.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_max_width(420.0);
                    let header = egui::CollapsingHeader::new(
                        egui::RichText::new("Block").color(colors::TEXT_SECONDARY),
                    )
                    .default_open(true);
                    header.show(ui, |ui| {
                        let color = if panel.in_snapshot {
                            colors::TEXT_PRIMARY
                        } else {
                            colors::TEXT_MUTED
                        };
                        for line in panel.lines() {
                            ui.add(
                                egui::Label::new(egui::RichText::new(line).monospace().color(color))
                                    .wrap(),
                            );
                        }
                    });
                });
            });
    }

    /// Support gradient and link styles, anchored bottom-left
    pub(crate) fn draw_legend(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("legend_area"))
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    let header = egui::CollapsingHeader::new(
                        egui::RichText::new("Legend").color(colors::TEXT_MUTED),
                    )
                    .default_open(true);

                    header.show(ui, |ui| {
                        ui.label(egui::RichText::new("Support").color(colors::TEXT_SECONDARY));
                        ui.horizontal(|ui| {
                            for pct in [0u32, 25, 50, 75, 100] {
                                let color = hsl_color(Hsl::support(pct as f64 / 100.0));
                                ui.vertical(|ui| {
                                    let (swatch, _) = ui.allocate_exact_size(
                                        egui::vec2(28.0, 12.0),
                                        egui::Sense::hover(),
                                    );
                                    ui.painter().rect_filled(swatch, 2.0, color);
                                    ui.label(
                                        egui::RichText::new(format!("{}%", pct))
                                            .small()
                                            .color(colors::TEXT_MUTED),
                                    );
                                });
                            }
                        });

                        ui.add_space(4.0);
                        for (style, name) in [
                            (LinkStyle::Canonical, "Canonical chain"),
                            (LinkStyle::Default, "Fork"),
                        ] {
                            ui.horizontal(|ui| {
                                let (line, _) = ui.allocate_exact_size(
                                    egui::vec2(28.0, 10.0),
                                    egui::Sense::hover(),
                                );
                                ui.painter().line_segment(
                                    [line.left_center(), line.right_center()],
                                    link_stroke(style, 1.0),
                                );
                                ui.label(egui::RichText::new(name).color(colors::TEXT_SECONDARY));
                            });
                        }
                        ui.label(
                            egui::RichText::new("Heavy border: Final / Best Just.")
                                .small()
                                .color(colors::TEXT_MUTED),
                        );
                    });
                });
            });
    }
}
