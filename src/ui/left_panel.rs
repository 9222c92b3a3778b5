//! Left panel UI: the layer table of contents.
//!
//! Renders the recursive layer tree with visibility toggles, per-layer
//! export buttons, and opacity control for raster layers. Mutations are
//! returned as [`PanelAction`]s and applied by the app after rendering.

use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

use super::{colors, PanelAction};
use crate::legend::ColorRamp;
use crate::state::{LayerData, LayerKind, LayerNode, LayerRegistry};

pub fn render_left_panel(ctx: &egui::Context, registry: &LayerRegistry) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(260.0)
        .min_width(220.0)
        .max_width(400.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                render_nodes(ui, registry, registry.tree(), &mut actions);
            });
        });

    actions
}

fn render_nodes(
    ui: &mut egui::Ui,
    registry: &LayerRegistry,
    nodes: &[LayerNode],
    actions: &mut Vec<PanelAction>,
) {
    for node in nodes {
        match node {
            LayerNode::Group { title, children } => {
                egui::CollapsingHeader::new(RichText::new(title).strong())
                    .default_open(true)
                    .show(ui, |ui| {
                        render_nodes(ui, registry, children, actions);
                    });
            }
            LayerNode::Layer(id) => {
                let Some(layer) = registry.get(*id) else {
                    continue;
                };

                ui.horizontal(|ui| {
                    let mut visible = layer.visible;
                    if ui.checkbox(&mut visible, &layer.title).changed() {
                        actions.push(PanelAction::ToggleVisible(layer.id));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let download = ui
                            .button(RichText::new(icons::DOWNLOAD_SIMPLE).size(13.0))
                            .on_hover_text("Export this layer");
                        if download.clicked() {
                            actions.push(PanelAction::Download(layer.id));
                        }

                        if layer.loading {
                            ui.spinner();
                        } else if !matches!(layer.data, LayerData::Empty) {
                            ui.label(
                                RichText::new("\u{2713}")
                                    .small()
                                    .color(colors::ui::SUCCESS),
                            );
                        }

                        ui.label(
                            RichText::new(layer.kind().label())
                                .small()
                                .color(colors::ui::LABEL),
                        );
                    });
                });

                if layer.kind() == LayerKind::GeoTiff {
                    ui.indent(("raster_controls", layer.id), |ui| {
                        let mut opacity = layer.opacity;
                        let slider = ui.add(
                            egui::Slider::new(&mut opacity, 0.0..=1.0)
                                .text("Opacity")
                                .show_value(false),
                        );
                        if slider.changed() {
                            actions.push(PanelAction::SetOpacity(layer.id, opacity));
                        }

                        let mut ramp = layer.ramp;
                        egui::ComboBox::from_id_salt(("ramp", layer.id))
                            .selected_text(ramp.label())
                            .width(130.0)
                            .show_ui(ui, |ui| {
                                for candidate in ColorRamp::all() {
                                    let stops = candidate.stops();
                                    ui.selectable_value(&mut ramp, *candidate, candidate.label())
                                        .on_hover_text(format!(
                                            "{} → {}",
                                            stops.first().map(|s| s.label).unwrap_or(""),
                                            stops.last().map(|s| s.label).unwrap_or(""),
                                        ));
                                }
                            });
                        if ramp != layer.ramp {
                            actions.push(PanelAction::SetRamp(layer.id, ramp));
                        }
                    });
                }
            }
        }
    }
}
