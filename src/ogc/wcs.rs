//! WCS `GetCoverage` request construction.

use super::append_query;

/// Coverage exports are requested as GeoTIFF.
pub const COVERAGE_FORMAT: &str = "image/geotiff";

/// Builds a WCS 2.0.1 `GetCoverage` URL for a raster coverage.
pub fn get_coverage_url(base_url: &str, coverage_id: &str) -> String {
    append_query(
        base_url,
        &format!(
            "service=WCS&version=2.0.1&request=GetCoverage\
             &coverageId={coverage}&format={format}",
            coverage = coverage_id,
            format = COVERAGE_FORMAT,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_coverage_url() {
        let url = get_coverage_url("https://example.org/ows", "demo__air_temperature");
        assert!(url.contains("service=WCS"));
        assert!(url.contains("request=GetCoverage"));
        assert!(url.contains("coverageId=demo__air_temperature"));
        assert!(url.contains("format=image/geotiff"));
    }
}
