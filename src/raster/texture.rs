//! Texture cache for rendered raster layers.
//!
//! Colorizing a grid through its ramp is too slow to repeat every frame, so
//! the resulting image is cached as an egui texture per layer and rebuilt
//! only when the grid, ramp, range, or opacity changes.

use std::collections::HashMap;
use std::sync::Arc;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::legend::{color_for_value, ColorRamp};
use crate::state::LayerId;

use super::RasterGrid;

/// Identifies the inputs a cached texture was built from.
#[derive(Clone, PartialEq)]
struct TextureSignature {
    /// Identity of the decoded grid (Arc pointer, grids are immutable)
    grid_ptr: usize,
    ramp: ColorRamp,
    range: (f64, f64),
    /// Opacity quantized to avoid float-compare churn
    opacity_milli: u32,
}

struct CachedTexture {
    signature: TextureSignature,
    handle: TextureHandle,
}

/// Per-layer cache of colorized raster textures.
#[derive(Default)]
pub struct RasterTextureCache {
    entries: HashMap<LayerId, CachedTexture>,
}

impl RasterTextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for a layer's grid, rebuilding it if the inputs
    /// changed since the last frame.
    pub fn texture_for(
        &mut self,
        ctx: &egui::Context,
        layer_id: LayerId,
        grid: &Arc<RasterGrid>,
        ramp: ColorRamp,
        range: (f64, f64),
        opacity: f32,
    ) -> &TextureHandle {
        let signature = TextureSignature {
            grid_ptr: Arc::as_ptr(grid) as usize,
            ramp,
            range,
            opacity_milli: (opacity.clamp(0.0, 1.0) * 1000.0) as u32,
        };

        let stale = self
            .entries
            .get(&layer_id)
            .map_or(true, |c| c.signature != signature);

        if stale {
            log::debug!(
                "Rebuilding raster texture for layer {:?} ({}x{})",
                layer_id,
                grid.width,
                grid.height
            );
            let image = colorize(grid, ramp, range, opacity);
            let handle = ctx.load_texture(
                format!("raster_layer_{}", layer_id.0),
                image,
                TextureOptions {
                    magnification: egui::TextureFilter::Linear,
                    minification: egui::TextureFilter::Linear,
                    ..Default::default()
                },
            );
            self.entries.insert(
                layer_id,
                CachedTexture {
                    signature,
                    handle,
                },
            );
        }

        &self.entries.get(&layer_id).expect("just inserted").handle
    }

    /// Drops a layer's cached texture, forcing a rebuild on next use.
    pub fn invalidate(&mut self, layer_id: LayerId) {
        self.entries.remove(&layer_id);
    }
}

/// Maps every grid cell through the ramp into an RGBA image.
/// Nodata cells become fully transparent.
fn colorize(grid: &RasterGrid, ramp: ColorRamp, range: (f64, f64), opacity: f32) -> ColorImage {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
    let mut pixels = Vec::with_capacity(grid.width * grid.height * 4);

    for row in 0..grid.height {
        for col in 0..grid.width {
            match grid.value_at(col, row) {
                Some(v) => {
                    let c = color_for_value(ramp, range.0, range.1, v as f64);
                    pixels.extend_from_slice(&[c.r(), c.g(), c.b(), alpha.min(c.a())]);
                }
                None => pixels.extend_from_slice(&[0, 0, 0, 0]),
            }
        }
    }

    ColorImage::from_rgba_unmultiplied([grid.width, grid.height], &pixels)
}
