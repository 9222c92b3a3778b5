//! Map view and coordinate transformation.
//!
//! Converts between geographic coordinates (lon/lat), projected map
//! coordinates (EPSG:3857 meters), and screen coordinates on the canvas.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;

use super::{lon_lat_to_mercator, mercator_to_lon_lat, BBox};

/// Current map view: center, zoom, pan, and the canvas rectangle.
#[derive(Debug, Clone)]
pub struct MapView {
    /// Geographic center of the view (lon/lat degrees)
    pub center: Coord<f64>,
    /// Current zoom level (1.0 = base resolution)
    pub zoom: f32,
    /// Ground resolution in meters per pixel at zoom 1.0
    pub base_resolution: f64,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            // Default to the Cologne metropolitan area
            center: Coord { x: 6.96, y: 50.94 },
            zoom: 1.0,
            // Roughly a city-scale view on a 1000px canvas
            base_resolution: 40.0,
            pan_offset: Vec2::ZERO,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapView {
    /// Updates the view with current canvas state.
    pub fn update(&mut self, zoom: f32, pan_offset: Vec2, screen_rect: Rect) {
        self.zoom = zoom;
        self.pan_offset = pan_offset;
        self.screen_rect = screen_rect;
    }

    /// Effective ground resolution in meters per pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        self.base_resolution / self.zoom as f64
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let (mx, my) = lon_lat_to_mercator(coord.x, coord.y);
        let (cx, cy) = lon_lat_to_mercator(self.center.x, self.center.y);
        let res = self.resolution();

        let origin = self.screen_rect.center() + self.pan_offset;

        Pos2::new(
            origin.x + ((mx - cx) / res) as f32,
            // Screen Y increases downward, northing increases upward
            origin.y - ((my - cy) / res) as f32,
        )
    }

    /// Converts screen position back to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let (cx, cy) = lon_lat_to_mercator(self.center.x, self.center.y);
        let res = self.resolution();

        let origin = self.screen_rect.center() + self.pan_offset;

        let mx = cx + ((pos.x - origin.x) as f64) * res;
        let my = cy - ((pos.y - origin.y) as f64) * res;

        let (lon, lat) = mercator_to_lon_lat(mx, my);
        Coord { x: lon, y: lat }
    }

    /// Returns the currently visible extent in projected map coordinates.
    pub fn visible_bbox(&self) -> BBox {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        let (min_x, max_y) = lon_lat_to_mercator(top_left.x, top_left.y);
        let (max_x, min_y) = lon_lat_to_mercator(bottom_right.x, bottom_right.y);

        BBox::new(min_x, min_y, max_x, max_y)
    }

    /// Checks if a coordinate is within the visible bounds (with a degree margin).
    pub fn is_visible(&self, coord: Coord<f64>, margin_deg: f64) -> bool {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        coord.x >= top_left.x - margin_deg
            && coord.x <= bottom_right.x + margin_deg
            && coord.y <= top_left.y + margin_deg
            && coord.y >= bottom_right.y - margin_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_view() -> MapView {
        let mut view = MapView::default();
        view.update(
            1.0,
            Vec2::ZERO,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        );
        view
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let view = test_view();
        let pos = view.geo_to_screen(view.center);
        assert!((pos.x - 400.0).abs() < 0.5);
        assert!((pos.y - 300.0).abs() < 0.5);
    }

    #[test]
    fn test_screen_geo_roundtrip() {
        let view = test_view();
        let pos = Pos2::new(123.0, 456.0);
        let geo = view.screen_to_geo(pos);
        let back = view.geo_to_screen(geo);
        assert!((back.x - pos.x).abs() < 0.01);
        assert!((back.y - pos.y).abs() < 0.01);
    }

    #[test]
    fn test_visible_bbox_matches_resolution() {
        let view = test_view();
        let bbox = view.visible_bbox();
        // 800px at 40 m/px is a 32km wide extent.
        assert!((bbox.width() - 800.0 * 40.0).abs() < 1.0);
        assert!((bbox.height() - 600.0 * 40.0).abs() < 1.0);
    }

    #[test]
    fn test_zoom_narrows_extent() {
        let mut view = test_view();
        let wide = view.visible_bbox();
        view.zoom = 2.0;
        let narrow = view.visible_bbox();
        assert!((wide.width() / narrow.width() - 2.0).abs() < 0.01);
    }
}
