//! GeoTIFF decoding into a [`RasterGrid`].
//!
//! Reads the first band of a (Geo)TIFF along with the georeferencing tags
//! (ModelPixelScale/ModelTiepoint) and the GDAL nodata marker.

use std::io::Cursor;

use thiserror::Error;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

use super::{GeoTransform, RasterGrid};

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GDAL_NODATA: u16 = 42113;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("TIFF decode failed: {0}")]
    Decode(String),
    #[error("unsupported TIFF sample format")]
    UnsupportedFormat,
    #[error("missing georeferencing tags (ModelPixelScale/ModelTiepoint)")]
    NotGeoreferenced,
    #[error("malformed raster: {0}")]
    Malformed(String),
}

/// Decodes GeoTIFF bytes into an in-memory grid.
pub fn decode_geotiff(bytes: &[u8]) -> Result<RasterGrid, RasterError> {
    let mut decoder =
        Decoder::new(Cursor::new(bytes)).map_err(|e| RasterError::Decode(e.to_string()))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| RasterError::Decode(e.to_string()))?;

    let channels = match decoder.colortype() {
        Ok(ColorType::Gray(_)) => 1,
        Ok(ColorType::RGB(_)) => 3,
        Ok(ColorType::RGBA(_)) => 4,
        Ok(ColorType::GrayA(_)) => 2,
        Ok(_) => return Err(RasterError::UnsupportedFormat),
        Err(e) => return Err(RasterError::Decode(e.to_string())),
    };

    // Georeferencing tags must be read before read_image consumes the decoder
    // state for the first directory.
    let pixel_scale = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
        .ok();
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT))
        .ok();
    let nodata = decoder
        .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
        .ok()
        .and_then(|s| parse_nodata(&s));

    let transform = build_transform(pixel_scale.as_deref(), tiepoint.as_deref())?;

    let image = decoder
        .read_image()
        .map_err(|e| RasterError::Decode(e.to_string()))?;

    let samples = first_band_as_f32(image, channels);
    let expected = width as usize * height as usize;
    if samples.len() != expected {
        return Err(RasterError::Malformed(format!(
            "decoded {} samples, expected {}",
            samples.len(),
            expected
        )));
    }

    RasterGrid::new(width as usize, height as usize, samples, transform, nodata)
        .map_err(RasterError::Malformed)
}

/// GDAL writes the nodata value as an ASCII tag, sometimes NUL-terminated.
fn parse_nodata(raw: &str) -> Option<f32> {
    raw.trim_matches(char::from(0)).trim().parse::<f32>().ok()
}

fn build_transform(
    pixel_scale: Option<&[f64]>,
    tiepoint: Option<&[f64]>,
) -> Result<GeoTransform, RasterError> {
    let scale = pixel_scale.filter(|s| s.len() >= 2);
    let tie = tiepoint.filter(|t| t.len() >= 6);
    match (scale, tie) {
        (Some(scale), Some(tie)) => {
            // Tiepoint maps raster position (i, j) to world position (x, y).
            let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
            let (sx, sy) = (scale[0], scale[1].abs());
            if sx <= 0.0 || sy <= 0.0 {
                return Err(RasterError::Malformed("non-positive pixel scale".into()));
            }
            Ok(GeoTransform {
                origin_x: x - i * sx,
                origin_y: y + j * sy,
                pixel_width: sx,
                pixel_height: sy,
            })
        }
        _ => Err(RasterError::NotGeoreferenced),
    }
}

/// Extracts the first band from an interleaved decode result as f32.
fn first_band_as_f32(image: DecodingResult, channels: usize) -> Vec<f32> {
    fn pick<T: Copy, F: Fn(T) -> f32>(data: Vec<T>, channels: usize, conv: F) -> Vec<f32> {
        data.iter().step_by(channels).map(|v| conv(*v)).collect()
    }

    match image {
        DecodingResult::U8(data) => pick(data, channels, |v| v as f32),
        DecodingResult::U16(data) => pick(data, channels, |v| v as f32),
        DecodingResult::U32(data) => pick(data, channels, |v| v as f32),
        DecodingResult::U64(data) => pick(data, channels, |v| v as f32),
        DecodingResult::I8(data) => pick(data, channels, |v| v as f32),
        DecodingResult::I16(data) => pick(data, channels, |v| v as f32),
        DecodingResult::I32(data) => pick(data, channels, |v| v as f32),
        DecodingResult::I64(data) => pick(data, channels, |v| v as f32),
        DecodingResult::F32(data) => pick(data, channels, |v| v),
        DecodingResult::F64(data) => pick(data, channels, |v| v as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodata_variants() {
        assert_eq!(parse_nodata("-9999"), Some(-9999.0));
        assert_eq!(parse_nodata("-9999\u{0}"), Some(-9999.0));
        assert_eq!(parse_nodata(" 0 "), Some(0.0));
        assert_eq!(parse_nodata("nodata"), None);
    }

    #[test]
    fn test_transform_from_tags() {
        // Tiepoint anchors pixel (0,0) at world (1000, 2000), 10m pixels.
        let transform = build_transform(
            Some(&[10.0, 10.0, 0.0]),
            Some(&[0.0, 0.0, 0.0, 1000.0, 2000.0, 0.0]),
        )
        .unwrap();
        assert_eq!(transform.origin_x, 1000.0);
        assert_eq!(transform.origin_y, 2000.0);
        assert_eq!(transform.pixel_width, 10.0);
    }

    #[test]
    fn test_transform_with_offset_tiepoint() {
        // Tiepoint anchored at pixel (2, 4) instead of the corner.
        let transform = build_transform(
            Some(&[5.0, 5.0, 0.0]),
            Some(&[2.0, 4.0, 0.0, 100.0, 200.0, 0.0]),
        )
        .unwrap();
        assert_eq!(transform.origin_x, 90.0);
        assert_eq!(transform.origin_y, 220.0);
    }

    #[test]
    fn test_missing_tags_rejected() {
        assert!(matches!(
            build_transform(None, None),
            Err(RasterError::NotGeoreferenced)
        ));
        assert!(matches!(
            build_transform(Some(&[10.0, 10.0, 0.0]), None),
            Err(RasterError::NotGeoreferenced)
        ));
    }

    #[test]
    fn test_first_band_extraction() {
        let rgb = DecodingResult::U8(vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(first_band_as_f32(rgb, 3), vec![10.0, 40.0]);

        let gray = DecodingResult::F32(vec![1.5, 2.5]);
        assert_eq!(first_band_as_f32(gray, 1), vec![1.5, 2.5]);
    }
}
