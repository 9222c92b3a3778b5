//! Popup windows: feature info results and user alerts.

use eframe::egui::{self, Pos2, RichText};

use super::colors;
use crate::info::{InfoValue, LayerInfoResult};
use crate::state::StatusState;

/// Feature info popup state, anchored near the originating click.
pub struct InfoPopup {
    pub anchor: Pos2,
    pub results: Vec<LayerInfoResult>,
    /// True while the click's requests are still in flight
    pub pending: bool,
    pub open: bool,
}

impl InfoPopup {
    pub fn pending_at(anchor: Pos2) -> Self {
        Self {
            anchor,
            results: Vec::new(),
            pending: true,
            open: true,
        }
    }
}

/// Renders the feature info window; closes itself via the title bar button.
pub fn render_info_popup(ctx: &egui::Context, popup: &mut InfoPopup) {
    let mut open = popup.open;

    egui::Window::new("Feature Info")
        .default_pos(popup.anchor)
        .collapsible(false)
        .resizable(false)
        .default_width(260.0)
        .open(&mut open)
        .show(ctx, |ui| {
            if popup.pending {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Querying layers...");
                });
                return;
            }

            if popup.results.is_empty() {
                ui.label(
                    RichText::new("No queryable layers at this position")
                        .small()
                        .color(colors::ui::LABEL),
                );
                return;
            }

            for result in &popup.results {
                ui.label(RichText::new(&result.layer_title).strong().size(12.0));
                match &result.value {
                    Some(InfoValue::Features(lines)) => {
                        for line in lines {
                            ui.label(RichText::new(line).monospace().size(11.0));
                        }
                    }
                    Some(InfoValue::Pixel(value)) => {
                        ui.label(
                            RichText::new(format!("{:.2}", value))
                                .monospace()
                                .size(11.0)
                                .color(colors::ui::ACTIVE),
                        );
                    }
                    Some(InfoValue::Empty) => {
                        ui.label(
                            RichText::new("no data here")
                                .small()
                                .color(colors::ui::LABEL),
                        );
                    }
                    None => {
                        ui.label(
                            RichText::new("request failed")
                                .small()
                                .color(colors::ui::ERROR),
                        );
                    }
                }
                ui.add_space(4.0);
            }
        });

    popup.open = open;
}

/// Renders every queued alert as a dismissible window.
pub fn render_alerts(ctx: &egui::Context, status: &mut StatusState) {
    let mut dismissed = Vec::new();

    for alert in &status.alerts {
        egui::Window::new(RichText::new(&alert.title).strong())
            .id(egui::Id::new(("alert", alert.id)))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, -(alert.id as f32) * 8.0])
            .show(ctx, |ui| {
                ui.label(&alert.body);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    dismissed.push(alert.id);
                }
            });
    }

    for id in dismissed {
        status.dismiss_alert(id);
    }
}
