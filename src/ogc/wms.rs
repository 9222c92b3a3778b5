//! WMS `GetMap` and `GetFeatureInfo` request construction.

use crate::geo::BBox;

use super::{append_query, ServerLimits, MAP_CRS};

/// Output format for map snapshots.
pub const SNAPSHOT_FORMAT: &str = "image/tiff";

/// Feature info responses are requested as GeoJSON.
pub const INFO_FORMAT: &str = "application/json";

/// Computes the pixel dimensions covering an extent at a ground resolution.
///
/// Dimensions round to the nearest pixel and never drop below 1.
pub fn pixel_dimensions(bbox: &BBox, resolution: f64) -> (u32, u32) {
    let width = (bbox.width() / resolution).round().max(1.0) as u32;
    let height = (bbox.height() / resolution).round().max(1.0) as u32;
    (width, height)
}

/// Scales dimensions down to the server limits, preserving aspect ratio.
/// Dimensions already within the limits pass through unchanged.
pub fn clamp_dimensions(width: u32, height: u32, limits: &ServerLimits) -> (u32, u32) {
    let scale_w = limits.max_width as f64 / width as f64;
    let scale_h = limits.max_height as f64 / height as f64;
    let scale = scale_w.min(scale_h);
    if scale >= 1.0 {
        return (width, height);
    }
    (
        ((width as f64 * scale) as u32).max(1),
        ((height as f64 * scale) as u32).max(1),
    )
}

/// Builds a WMS 1.3.0 `GetMap` URL for a clipped snapshot of one layer.
pub fn get_map_url(
    base_url: &str,
    layer_name: &str,
    bbox: &BBox,
    width: u32,
    height: u32,
) -> String {
    append_query(
        base_url,
        &format!(
            "service=WMS&version=1.3.0&request=GetMap\
             &layers={layer}&styles=&crs={crs}&bbox={bbox}\
             &width={width}&height={height}&format={format}&transparent=true",
            layer = layer_name,
            crs = MAP_CRS,
            bbox = bbox.to_query(),
            width = width,
            height = height,
            format = SNAPSHOT_FORMAT,
        ),
    )
}

/// Builds a WMS 1.3.0 `GetFeatureInfo` URL for a click at pixel (i, j)
/// within a rendered view of the given extent and size.
pub fn get_feature_info_url(
    base_url: &str,
    layer_name: &str,
    bbox: &BBox,
    width: u32,
    height: u32,
    i: u32,
    j: u32,
) -> String {
    append_query(
        base_url,
        &format!(
            "service=WMS&version=1.3.0&request=GetFeatureInfo\
             &layers={layer}&query_layers={layer}&styles=&crs={crs}&bbox={bbox}\
             &width={width}&height={height}&i={i}&j={j}\
             &info_format={info}&feature_count=10",
            layer = layer_name,
            crs = MAP_CRS,
            bbox = bbox.to_query(),
            width = width,
            height = height,
            i = i,
            j = j,
            info = INFO_FORMAT,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_dimensions_from_extent() {
        // 1000m wide extent at 10 m/px is a 100px image.
        let bbox = BBox::new(0.0, 0.0, 1000.0, 500.0);
        assert_eq!(pixel_dimensions(&bbox, 10.0), (100, 50));
    }

    #[test]
    fn test_pixel_dimensions_never_zero() {
        let bbox = BBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(pixel_dimensions(&bbox, 1000.0), (1, 1));
    }

    #[test]
    fn test_clamp_scales_down_to_server_maximum() {
        let limits = ServerLimits {
            max_width: 500,
            max_height: 500,
        };
        let (w, h) = clamp_dimensions(10_000, 5_000, &limits);
        assert!(w <= 500 && h <= 500);
        // Aspect ratio survives the clamp.
        assert_eq!(w, 500);
        assert_eq!(h, 250);
    }

    #[test]
    fn test_clamp_passes_small_requests_through() {
        let limits = ServerLimits {
            max_width: 500,
            max_height: 500,
        };
        assert_eq!(clamp_dimensions(100, 50, &limits), (100, 50));
    }

    #[test]
    fn test_snapshot_dimensions_clamped_before_url() {
        // Extent width 10000m at 1 m/px, server max 500px: the constructed
        // GetMap URL must carry the scaled-down size.
        let bbox = BBox::new(0.0, 0.0, 10_000.0, 10_000.0);
        let limits = ServerLimits {
            max_width: 500,
            max_height: 500,
        };
        let (w, h) = pixel_dimensions(&bbox, 1.0);
        let (w, h) = clamp_dimensions(w, h, &limits);
        let url = get_map_url("https://example.org/ows", "demo:landuse", &bbox, w, h);
        assert!(url.contains("width=500"));
        assert!(url.contains("height=500"));
    }

    #[test]
    fn test_get_map_url_parameters() {
        let bbox = BBox::new(100.0, 200.0, 300.0, 400.0);
        let url = get_map_url("https://example.org/ows", "demo:landuse", &bbox, 256, 256);
        assert!(url.starts_with("https://example.org/ows?"));
        assert!(url.contains("service=WMS"));
        assert!(url.contains("request=GetMap"));
        assert!(url.contains("layers=demo:landuse"));
        assert!(url.contains("crs=EPSG:3857"));
        assert!(url.contains("bbox=100.000,200.000,300.000,400.000"));
        assert!(url.contains("format=image/tiff"));
    }

    #[test]
    fn test_feature_info_url_parameters() {
        let bbox = BBox::new(0.0, 0.0, 1000.0, 1000.0);
        let url = get_feature_info_url(
            "https://example.org/ows",
            "demo:stations",
            &bbox,
            800,
            600,
            120,
            340,
        );
        assert!(url.contains("request=GetFeatureInfo"));
        assert!(url.contains("query_layers=demo:stations"));
        assert!(url.contains("i=120"));
        assert!(url.contains("j=340"));
        assert!(url.contains("info_format=application/json"));
    }
}
