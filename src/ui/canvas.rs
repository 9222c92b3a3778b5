//! Central canvas UI: the map rendering area.
//!
//! Paints visible layers bottom-up in TOC order, applies the swipe clip to
//! compared layers, and handles pan/zoom/click interaction. Returns the
//! screen position of a click so the app can fire a feature info query.

use eframe::egui::{self, pos2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use geo_types::Coord;

use super::colors;
use crate::geo::MapView;
use crate::raster::RasterTextureCache;
use crate::state::{AppState, LayerKind, MapLayer, VisibleLayerTracker};
use crate::vector::{VectorData, VectorFeature};

/// Pointer distance (px) within which a drag grabs the swipe divider.
const DIVIDER_GRAB_DISTANCE: f32 = 8.0;

pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    tracker: &VisibleLayerTracker,
    textures: &mut RasterTextureCache,
) -> Option<Pos2> {
    let mut clicked = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

        // Projections must use this frame's rect before anything draws.
        let zoom = state.viz.view.zoom;
        let pan = state.viz.view.pan_offset;
        state.viz.view.update(zoom, pan, rect);

        // Divider drags win over panning.
        let divider_dragged = handle_divider_drag(&response, &rect, state);

        let (left_clip, right_clip) = state.swipe.split(rect);
        let mut server_layers: Vec<String> = Vec::new();

        for id in tracker.visible() {
            let Some(layer) = state.registry.get(*id) else {
                continue;
            };

            let layer_painter = match state.swipe.side_of(*id) {
                Some(crate::state::SwipeSide::Left) => painter.with_clip_rect(left_clip),
                Some(crate::state::SwipeSide::Right) => painter.with_clip_rect(right_clip),
                None => painter.clone(),
            };

            match layer.kind() {
                LayerKind::Osm => {
                    draw_basemap(&layer_painter, &rect, &state.viz.view, state.viz.show_graticule)
                }
                LayerKind::GeoTiff => {
                    draw_raster(&layer_painter, textures, layer, &state.viz.view);
                }
                LayerKind::GeoJson => {
                    if let Some(data) = layer.vector() {
                        if !data.is_empty() {
                            draw_vector(&layer_painter, data, &state.viz.view);
                        }
                    }
                }
                LayerKind::WmsTiles | LayerKind::WmsFeatures => {
                    server_layers.push(layer.title.clone());
                }
            }
        }

        draw_server_layer_note(&painter, &rect, &server_layers);

        if state.swipe.is_active() {
            draw_divider(&painter, &rect, state.swipe.divider_x(rect));
        }

        if !divider_dragged {
            handle_canvas_interaction(&response, &rect, state);
        }

        state.viz.hover_coord = response
            .hover_pos()
            .map(|p| state.viz.view.screen_to_geo(p));

        if response.clicked() {
            clicked = response.interact_pointer_pos();
        }
    });

    clicked
}

/// Flat basemap stand-in for the OSM layer: land fill, graticule, and the
/// mandatory attribution line.
fn draw_basemap(painter: &Painter, rect: &Rect, view: &MapView, graticule: bool) {
    painter.rect_filled(*rect, 0.0, colors::canvas::BASEMAP);

    if graticule {
        draw_graticule(painter, rect, view);
    }

    painter.text(
        rect.right_bottom() + Vec2::new(-6.0, -4.0),
        egui::Align2::RIGHT_BOTTOM,
        "© OpenStreetMap contributors",
        FontId::proportional(10.0),
        colors::canvas::ATTRIBUTION,
    );
}

fn draw_graticule(painter: &Painter, rect: &Rect, view: &MapView) {
    let top_left = view.screen_to_geo(rect.left_top());
    let bottom_right = view.screen_to_geo(rect.right_bottom());

    let span = (bottom_right.x - top_left.x).abs().max(1e-9);
    let step = graticule_step(span);
    let stroke = Stroke::new(0.5, colors::canvas::graticule());

    let mut lon = (top_left.x / step).floor() * step;
    while lon <= bottom_right.x {
        let x = view.geo_to_screen(Coord { x: lon, y: view.center.y }).x;
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            stroke,
        );
        lon += step;
    }

    let mut lat = (bottom_right.y / step).floor() * step;
    while lat <= top_left.y {
        let y = view.geo_to_screen(Coord { x: view.center.x, y: lat }).y;
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            stroke,
        );
        lat += step;
    }
}

/// Picks a graticule interval yielding a handful of lines across the view.
fn graticule_step(span_deg: f64) -> f64 {
    const STEPS: &[f64] = &[0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0];
    for step in STEPS {
        if span_deg / step <= 10.0 {
            return *step;
        }
    }
    30.0
}

fn draw_raster(
    painter: &Painter,
    textures: &mut RasterTextureCache,
    layer: &MapLayer,
    view: &MapView,
) {
    let Some(grid) = layer.raster() else {
        return;
    };

    let texture = textures.texture_for(
        painter.ctx(),
        layer.id,
        grid,
        layer.ramp,
        layer.value_range,
        layer.opacity,
    );

    let (min_x, min_y, max_x, max_y) = grid.bounds();
    let top_left = view.geo_to_screen(Coord { x: min_x, y: max_y });
    let bottom_right = view.geo_to_screen(Coord { x: max_x, y: min_y });

    painter.image(
        texture.id(),
        Rect::from_min_max(top_left, bottom_right),
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
        Color32::WHITE,
    );
}

fn draw_vector(painter: &Painter, data: &VectorData, view: &MapView) {
    let stroke = Stroke::new(1.5, colors::canvas::VECTOR_STROKE);

    for feature in &data.features {
        match feature {
            VectorFeature::Point(coord, label) => {
                if !view.is_visible(*coord, 0.5) {
                    continue;
                }
                let pos = view.geo_to_screen(*coord);
                painter.circle_filled(pos, 3.5, colors::canvas::VECTOR_STROKE);
                if let Some(label) = label {
                    painter.text(
                        pos + Vec2::new(6.0, -2.0),
                        egui::Align2::LEFT_CENTER,
                        label,
                        FontId::proportional(10.0),
                        colors::canvas::VECTOR_LABEL,
                    );
                }
            }
            VectorFeature::LineString(coords) => {
                draw_line(painter, view, coords, stroke);
            }
            VectorFeature::MultiLineString(lines) => {
                for line in lines {
                    draw_line(painter, view, line, stroke);
                }
            }
            VectorFeature::Polygon {
                exterior, label, ..
            } => {
                draw_polygon(painter, view, exterior, label.as_deref(), stroke);
            }
            VectorFeature::MultiPolygon { polygons, label } => {
                for (index, (exterior, _)) in polygons.iter().enumerate() {
                    // Label only the first part to avoid duplicates.
                    let label = if index == 0 { label.as_deref() } else { None };
                    draw_polygon(painter, view, exterior, label, stroke);
                }
            }
        }
    }
}

fn draw_line(painter: &Painter, view: &MapView, coords: &[Coord<f64>], stroke: Stroke) {
    if coords.len() < 2 {
        return;
    }
    let points: Vec<Pos2> = coords.iter().map(|c| view.geo_to_screen(*c)).collect();
    painter.add(egui::Shape::line(points, stroke));
}

fn draw_polygon(
    painter: &Painter,
    view: &MapView,
    exterior: &[Coord<f64>],
    label: Option<&str>,
    stroke: Stroke,
) {
    if exterior.len() < 3 {
        return;
    }
    let points: Vec<Pos2> = exterior.iter().map(|c| view.geo_to_screen(*c)).collect();

    painter.add(egui::Shape::convex_polygon(
        points.clone(),
        colors::canvas::vector_fill(),
        Stroke::NONE,
    ));

    let mut outline = points.clone();
    outline.push(points[0]);
    painter.add(egui::Shape::line(outline, stroke));

    if let Some(label) = label {
        if let Some(centroid) = polygon_centroid(&points) {
            painter.text(
                centroid,
                egui::Align2::CENTER_CENTER,
                label,
                FontId::proportional(10.0),
                colors::canvas::VECTOR_LABEL,
            );
        }
    }
}

/// Calculate the centroid of a polygon.
fn polygon_centroid(points: &[Pos2]) -> Option<Pos2> {
    if points.is_empty() {
        return None;
    }

    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some(Pos2::new(
        sum.x / points.len() as f32,
        sum.y / points.len() as f32,
    ))
}

/// Server-rendered WMS layers have no client-side imagery; list them so the
/// user knows they are active.
fn draw_server_layer_note(painter: &Painter, rect: &Rect, titles: &[String]) {
    if titles.is_empty() {
        return;
    }
    painter.text(
        rect.left_bottom() + Vec2::new(6.0, -4.0),
        egui::Align2::LEFT_BOTTOM,
        format!("Server-rendered: {}", titles.join(", ")),
        FontId::proportional(10.0),
        colors::canvas::ATTRIBUTION,
    );
}

fn draw_divider(painter: &Painter, rect: &Rect, x: f32) {
    painter.line_segment(
        [pos2(x, rect.top()), pos2(x, rect.bottom())],
        Stroke::new(2.0, colors::swipe::DIVIDER),
    );

    let center = pos2(x, rect.center().y);
    painter.circle_filled(center, 9.0, colors::swipe::HANDLE);
    painter.circle_stroke(center, 9.0, Stroke::new(1.5, colors::swipe::DIVIDER));
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        "⇔",
        FontId::proportional(11.0),
        colors::swipe::DIVIDER,
    );
}

/// Drags near the divider move the split instead of panning the map.
/// Returns true while such a drag is in progress.
fn handle_divider_drag(response: &egui::Response, rect: &Rect, state: &mut AppState) -> bool {
    if !state.swipe.is_active() || !response.dragged() {
        return false;
    }
    let Some(pointer) = response.interact_pointer_pos() else {
        return false;
    };

    let divider_x = state.swipe.divider_x(*rect);
    let grab = (pointer.x - divider_x).abs() <= DIVIDER_GRAB_DISTANCE
        + response.drag_delta().x.abs();
    if !grab {
        return false;
    }

    let position = (pointer.x - rect.left()) / rect.width().max(1.0);
    state.swipe.position = position.clamp(0.0, 1.0);
    true
}

fn handle_canvas_interaction(response: &egui::Response, rect: &Rect, state: &mut AppState) {
    // Handle dragging for panning
    if response.dragged() {
        state.viz.view.pan_offset += response.drag_delta();
    }

    // Handle scroll for zooming relative to cursor position
    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            let zoom_factor = 1.0 + scroll_delta.y * 0.001;
            let old_zoom = state.viz.view.zoom;
            let new_zoom = (old_zoom * zoom_factor).clamp(0.1, 50.0);

            // Adjust pan offset to keep the point under cursor stationary
            if let Some(cursor_pos) = response.hover_pos() {
                let cursor_rel = cursor_pos - rect.center();
                let ratio = new_zoom / old_zoom;
                state.viz.view.pan_offset =
                    cursor_rel * (1.0 - ratio) + state.viz.view.pan_offset * ratio;
            }

            state.viz.view.zoom = new_zoom;
        }
    }

    // Reset view on double-click
    if response.double_clicked() {
        state.viz.view.zoom = 1.0;
        state.viz.view.pan_offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graticule_step_scales_with_span() {
        assert_eq!(graticule_step(0.05), 0.01);
        assert_eq!(graticule_step(0.8), 0.1);
        assert_eq!(graticule_step(8.0), 1.0);
        assert_eq!(graticule_step(500.0), 30.0);
    }

    #[test]
    fn test_polygon_centroid() {
        let points = vec![
            pos2(0.0, 0.0),
            pos2(4.0, 0.0),
            pos2(4.0, 4.0),
            pos2(0.0, 4.0),
        ];
        let centroid = polygon_centroid(&points).unwrap();
        assert_eq!(centroid, pos2(2.0, 2.0));
        assert!(polygon_centroid(&[]).is_none());
    }
}
