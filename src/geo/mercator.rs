//! Web Mercator (EPSG:3857) forward and inverse projection.

use std::f64::consts::PI;

/// WGS84 semi-major axis, the radius of the Web Mercator sphere.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit beyond which the projection degenerates.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Projects geographic coordinates (degrees) to Web Mercator meters.
///
/// Latitude is clamped to the projection's valid range rather than
/// returning infinities at the poles.
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = lon.to_radians() * EARTH_RADIUS_M;
    let y = ((PI / 4.0) + (lat.to_radians() / 2.0)).tan().ln() * EARTH_RADIUS_M;
    (x, y)
}

/// Inverse of [`lon_lat_to_mercator`]: meters back to degrees.
pub fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_origin() {
        let (x, y) = lon_lat_to_mercator(0.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_mercator_known_point() {
        // Cologne cathedral, a commonly cited reference point.
        let (x, y) = lon_lat_to_mercator(6.9583, 50.9413);
        assert!((x - 774_598.0).abs() < 100.0);
        assert!((y - 6_610_988.0).abs() < 2000.0);
    }

    #[test]
    fn test_mercator_roundtrip() {
        let (x, y) = lon_lat_to_mercator(13.405, 52.52);
        let (lon, lat) = mercator_to_lon_lat(x, y);
        assert!((lon - 13.405).abs() < 1e-9);
        assert!((lat - 52.52).abs() < 1e-9);
    }

    #[test]
    fn test_latitude_clamped_at_poles() {
        let (_, y) = lon_lat_to_mercator(0.0, 90.0);
        assert!(y.is_finite());
    }
}
