//! Top bar UI: app title, status message, and cursor readout.

use eframe::egui::{self, RichText};

use super::colors;
use crate::state::AppState;

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("MapLab Workbench")
                        .strong()
                        .size(16.0)
                        .color(egui::Color32::WHITE),
                );

                ui.separator();

                ui.label(
                    RichText::new(&state.status.message)
                        .size(13.0)
                        .color(colors::ui::VALUE),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(state.viz.hover_label())
                            .monospace()
                            .size(12.0)
                            .color(colors::ui::LABEL),
                    );
                    ui.label(RichText::new("lon/lat:").size(12.0).color(colors::ui::LABEL));
                });
            });
        });
}
