//! Header bar with view controls, chain summary and fetch status

use eframe::egui;
use crate::core::{LayoutStyle, RefreshState};
use crate::fetch_state::FetchStatus;
use crate::theme::colors;
use super::ForkChoiceApp;

impl ForkChoiceApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        let fetch_status = self.fetch_status();
        let summary = self.session.summary();
        let node_count = self.session.snapshot().node_count();

        ui.horizontal(|ui| {
            // LEFT: view controls
            if ui.button("Reset view").clicked() {
                self.session.reset_view();
            }

            let labels_text = if self.session.ui().labels_hidden {
                "Show labels"
            } else {
                "Hide labels"
            };
            if ui.button(labels_text).clicked() {
                self.session.toggle_labels();
            }

            ui.add_space(10.0);

            for &style in LayoutStyle::ALL {
                let selected = self.session.ui().layout_style == style;
                let color = if selected {
                    colors::TEXT_PRIMARY
                } else {
                    colors::TEXT_MUTED
                };
                if ui
                    .selectable_label(selected, egui::RichText::new(style.label()).color(color))
                    .clicked()
                {
                    self.session.set_layout_style(style);
                }
            }

            ui.add_space(10.0);

            let refresh_text = match self.session.refresh_state() {
                RefreshState::Running => "Pause auto-refresh",
                RefreshState::Paused => "Resume auto-refresh",
            };
            if ui.button(refresh_text).clicked() {
                self.toggle_auto_refresh();
            }

            ui.add_space(6.0);
            let legend_text = if self.show_legend { "Legend <<<" } else { "Legend >>>" };
            if ui.button(legend_text).clicked() {
                self.show_legend = !self.show_legend;
            }

            // RIGHT: status and summary (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let status_color = match &fetch_status {
                    FetchStatus::Ok => colors::OK,
                    FetchStatus::Idle | FetchStatus::Loading => colors::PENDING,
                    FetchStatus::Error(_) => colors::ERROR,
                };
                let status = ui.colored_label(status_color, fetch_status.label());
                if let FetchStatus::Error(reason) = &fetch_status {
                    status.on_hover_text(reason);
                }

                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(format!("{} blocks", node_count))
                        .color(colors::TEXT_SECONDARY),
                );

                for line in summary.lines().iter().rev() {
                    ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                    ui.label(egui::RichText::new(line).color(colors::TEXT_MUTED));
                }
            });
        });
    }
}
