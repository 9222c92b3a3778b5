//! Right panel UI: legends and the layer comparison controls.

use eframe::egui::{self, vec2, RichText, ScrollArea, Stroke, StrokeKind};

use super::colors;
use crate::legend::legend_entries;
use crate::state::{LayerId, LayerKind, LayerRegistry, SwipeState, VisibleLayerTracker};

pub fn render_right_panel(
    ctx: &egui::Context,
    registry: &LayerRegistry,
    tracker: &VisibleLayerTracker,
    swipe: &mut SwipeState,
) {
    egui::SidePanel::right("right_panel")
        .resizable(true)
        .default_width(230.0)
        .min_width(190.0)
        .max_width(350.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Controls");
                ui.separator();

                render_legend_section(ui, registry, tracker);
                ui.add_space(5.0);

                render_comparison_section(ui, registry, swipe);
            });
        });
}

fn render_legend_section(
    ui: &mut egui::Ui,
    registry: &LayerRegistry,
    tracker: &VisibleLayerTracker,
) {
    egui::CollapsingHeader::new(RichText::new("Legend").strong())
        .default_open(true)
        .show(ui, |ui| {
            let mut any = false;
            for id in tracker.visible() {
                let Some(layer) = registry.get(*id) else {
                    continue;
                };
                if layer.kind() != LayerKind::GeoTiff {
                    continue;
                }
                any = true;

                ui.label(RichText::new(&layer.title).small().strong());
                let (min, max) = layer.value_range;
                for entry in legend_entries(min, max, layer.ramp) {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, entry.color);
                        ui.painter().rect_stroke(
                            rect,
                            2.0,
                            Stroke::new(1.0, colors::legend::SWATCH_BORDER),
                            StrokeKind::Inside,
                        );
                        ui.label(RichText::new(entry.label).monospace().size(11.0));
                    });
                }
                ui.add_space(4.0);
            }

            if !any {
                ui.label(
                    RichText::new("No raster layers visible")
                        .small()
                        .color(colors::ui::LABEL),
                );
            }
        });
}

fn render_comparison_section(ui: &mut egui::Ui, registry: &LayerRegistry, swipe: &mut SwipeState) {
    egui::CollapsingHeader::new(RichText::new("Compare Layers").strong())
        .default_open(true)
        .show(ui, |ui| {
            layer_selector(ui, "swipe_left", "Left", registry, &mut swipe.left);
            layer_selector(ui, "swipe_right", "Right", registry, &mut swipe.right);

            ui.add_enabled_ui(swipe.is_active(), |ui| {
                ui.add(
                    egui::Slider::new(&mut swipe.position, 0.0..=1.0)
                        .text("Split")
                        .show_value(false),
                );
            });

            if swipe.is_active() {
                ui.label(
                    RichText::new("Comparison active")
                        .small()
                        .color(colors::ui::ACTIVE),
                );
            } else {
                ui.label(
                    RichText::new("Pick two different layers to compare")
                        .small()
                        .color(colors::ui::LABEL),
                );
            }
        });
}

fn layer_selector(
    ui: &mut egui::Ui,
    id_salt: &str,
    label: &str,
    registry: &LayerRegistry,
    selection: &mut Option<LayerId>,
) {
    let selected_text = selection
        .and_then(|id| registry.get(id))
        .map(|l| l.title.clone())
        .unwrap_or_else(|| "None".to_string());

    ui.horizontal(|ui| {
        ui.label(RichText::new(label).small());
        egui::ComboBox::from_id_salt(id_salt)
            .selected_text(selected_text)
            .width(150.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(selection, None, "None");
                for layer in registry.layers() {
                    ui.selectable_value(selection, Some(layer.id), &layer.title);
                }
            });
    });
}
