//! Geographic primitives: coordinate math, bounding boxes, and the map view.

mod mercator;
mod projection;

pub use mercator::{lon_lat_to_mercator, mercator_to_lon_lat};
pub use projection::MapView;

/// Axis-aligned bounding box in projected map coordinates (EPSG:3857 meters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the box in map units (meters).
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box in map units (meters).
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Serializes the box as a WMS/WCS `BBOX` query value.
    ///
    /// EPSG:3857 uses easting,northing axis order in WMS 1.3.0, so the
    /// components appear as min_x,min_y,max_x,max_y.
    pub fn to_query(&self) -> String {
        format!(
            "{:.3},{:.3},{:.3},{:.3}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(100.0, 200.0, 1100.0, 700.0);
        assert_eq!(bbox.width(), 1000.0);
        assert_eq!(bbox.height(), 500.0);
    }

    #[test]
    fn test_bbox_query_order() {
        let bbox = BBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(bbox.to_query(), "1.000,2.000,3.000,4.000");
    }
}
