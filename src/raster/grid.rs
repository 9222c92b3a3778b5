//! Decoded raster grid with georeferencing.

/// Affine georeferencing for a north-up raster.
///
/// `origin_x`/`origin_y` locate the outer corner of the top-left pixel in
/// world coordinates; `pixel_width`/`pixel_height` are the (positive) pixel
/// sizes. Row indices grow southward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

/// A single-band raster decoded into memory.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    pub width: usize,
    pub height: usize,
    samples: Vec<f32>,
    pub transform: GeoTransform,
    pub nodata: Option<f32>,
}

impl RasterGrid {
    /// Creates a grid; the sample buffer length must be `width * height`.
    pub fn new(
        width: usize,
        height: usize,
        samples: Vec<f32>,
        transform: GeoTransform,
        nodata: Option<f32>,
    ) -> Result<Self, String> {
        if samples.len() != width * height {
            return Err(format!(
                "sample buffer length {} does not match {}x{}",
                samples.len(),
                width,
                height
            ));
        }
        Ok(Self {
            width,
            height,
            samples,
            transform,
            nodata,
        })
    }

    /// Value at a pixel position, with nodata masked out.
    pub fn value_at(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let v = self.samples[row * self.width + col];
        if !v.is_finite() {
            return None;
        }
        if let Some(nodata) = self.nodata {
            if v == nodata {
                return None;
            }
        }
        Some(v)
    }

    /// Nearest-neighbor sample at a world coordinate.
    ///
    /// Returns None outside the grid footprint or on nodata cells.
    pub fn sample(&self, x: f64, y: f64) -> Option<f32> {
        let t = &self.transform;
        let col = (x - t.origin_x) / t.pixel_width;
        let row = (t.origin_y - y) / t.pixel_height;
        if col < 0.0 || row < 0.0 {
            return None;
        }
        self.value_at(col as usize, row as usize)
    }

    /// World-coordinate footprint as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let t = &self.transform;
        (
            t.origin_x,
            t.origin_y - self.height as f64 * t.pixel_height,
            t.origin_x + self.width as f64 * t.pixel_width,
            t.origin_y,
        )
    }

    /// Minimum and maximum finite, non-nodata values, if any exist.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let mut range: Option<(f32, f32)> = None;
        for row in 0..self.height {
            for col in 0..self.width {
                if let Some(v) = self.value_at(col, row) {
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
            }
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid() -> RasterGrid {
        // 3x2 grid anchored at (10, 20), 1x1 world units per pixel:
        //   row 0 (y 19..20): 1 2 3
        //   row 1 (y 18..19): 4 5 -9999
        RasterGrid::new(
            3,
            2,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, -9999.0],
            GeoTransform {
                origin_x: 10.0,
                origin_y: 20.0,
                pixel_width: 1.0,
                pixel_height: 1.0,
            },
            Some(-9999.0),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_center_of_cells() {
        let grid = test_grid();
        assert_eq!(grid.sample(10.5, 19.5), Some(1.0));
        assert_eq!(grid.sample(12.5, 19.5), Some(3.0));
        assert_eq!(grid.sample(11.5, 18.5), Some(5.0));
    }

    #[test]
    fn test_sample_outside_footprint() {
        let grid = test_grid();
        assert_eq!(grid.sample(9.5, 19.5), None);
        assert_eq!(grid.sample(13.5, 19.5), None);
        assert_eq!(grid.sample(10.5, 17.5), None);
    }

    #[test]
    fn test_nodata_masked() {
        let grid = test_grid();
        assert_eq!(grid.sample(12.5, 18.5), None);
    }

    #[test]
    fn test_value_range_skips_nodata() {
        let grid = test_grid();
        assert_eq!(grid.value_range(), Some((1.0, 5.0)));
    }

    #[test]
    fn test_bounds() {
        let grid = test_grid();
        assert_eq!(grid.bounds(), (10.0, 18.0, 13.0, 20.0));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = RasterGrid::new(
            2,
            2,
            vec![0.0; 3],
            GeoTransform {
                origin_x: 0.0,
                origin_y: 0.0,
                pixel_width: 1.0,
                pixel_height: 1.0,
            },
            None,
        );
        assert!(result.is_err());
    }
}
