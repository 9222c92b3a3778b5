//! WFS `GetFeature` request construction.

use super::append_query;

/// Shapefile archive output, the portable export format for vector layers.
pub const SHAPE_ZIP_FORMAT: &str = "SHAPE-ZIP";

/// Builds a WFS `GetFeature` URL exporting a feature type as a zipped
/// shapefile.
pub fn get_feature_url(base_url: &str, feature_type: &str) -> String {
    append_query(
        base_url,
        &format!(
            "service=WFS&version=1.1.0&request=GetFeature\
             &typeName={type_name}&outputFormat={format}",
            type_name = feature_type,
            format = SHAPE_ZIP_FORMAT,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_feature_url() {
        let url = get_feature_url("https://example.org/ows", "demo:stations");
        assert!(url.contains("service=WFS"));
        assert!(url.contains("request=GetFeature"));
        assert!(url.contains("typeName=demo:stations"));
        assert!(url.contains("outputFormat=SHAPE-ZIP"));
    }
}
