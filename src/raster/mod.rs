//! Raster data: decoded grids, GeoTIFF decoding, and texture caching.

mod geotiff;
mod grid;
mod texture;

pub use geotiff::{decode_geotiff, RasterError};
pub use grid::{GeoTransform, RasterGrid};
pub use texture::RasterTextureCache;
