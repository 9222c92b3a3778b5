//! Bottom panel UI: the forecast timeline.

use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

use super::{colors, PanelAction};
use crate::state::ForecastState;

pub fn render_bottom_panel(ctx: &egui::Context, forecast: &ForecastState) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    egui::TopBottomPanel::bottom("bottom_panel")
        .exact_height(56.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(RichText::new("Forecast").strong().size(13.0));
                ui.separator();

                if forecast.loading {
                    ui.spinner();
                    ui.label(RichText::new("Loading timestamps...").small());
                    return;
                }

                match &forecast.manifest {
                    Some(manifest) if !manifest.is_empty() => {
                        egui::ScrollArea::horizontal().show(ui, |ui| {
                            for (index, entry) in manifest.entries.iter().enumerate() {
                                let selected = forecast.selected == Some(index);
                                let button = egui::Button::new(
                                    RichText::new(&entry.label).monospace().size(11.0),
                                )
                                .selected(selected);
                                if ui.add(button).clicked() && !selected {
                                    actions.push(PanelAction::SelectForecast(index));
                                }
                            }
                        });
                    }
                    Some(_) => {
                        ui.label(
                            RichText::new("No forecast timestamps available")
                                .small()
                                .color(colors::ui::LABEL),
                        );
                    }
                    None => {
                        ui.label(
                            RichText::new("Forecast timestamps not loaded")
                                .small()
                                .color(colors::ui::LABEL),
                        );
                        if ui
                            .button(RichText::new(icons::ARROWS_CLOCKWISE).size(13.0))
                            .on_hover_text("Reload the timestamp manifest")
                            .clicked()
                        {
                            actions.push(PanelAction::ReloadManifest);
                        }
                    }
                }
            });
        });

    actions
}
