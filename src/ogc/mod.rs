//! OGC web service request construction and capabilities parsing.
//!
//! URL builders are pure string construction so they stay unit-testable;
//! nothing in this module performs I/O except through the caller's fetch.

pub mod capabilities;
pub mod wcs;
pub mod wfs;
pub mod wms;

pub use capabilities::{CapabilitiesCache, ServerLimits};

/// Map CRS used for all requests and extents.
pub const MAP_CRS: &str = "EPSG:3857";

/// Appends a query string to a base URL that may or may not already carry
/// query parameters (GeoServer endpoints often end in `/ows?`).
pub(crate) fn append_query(base_url: &str, query: &str) -> String {
    let trimmed = base_url.trim_end_matches(['?', '&']);
    let separator = if trimmed.contains('?') { '&' } else { '?' };
    format!("{}{}{}", trimmed, separator, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_query_plain_base() {
        assert_eq!(
            append_query("https://example.org/ows", "service=WMS"),
            "https://example.org/ows?service=WMS"
        );
    }

    #[test]
    fn test_append_query_existing_params() {
        assert_eq!(
            append_query("https://example.org/ows?map=demo", "service=WMS"),
            "https://example.org/ows?map=demo&service=WMS"
        );
    }

    #[test]
    fn test_append_query_trailing_separator() {
        assert_eq!(
            append_query("https://example.org/ows?", "service=WMS"),
            "https://example.org/ows?service=WMS"
        );
    }
}
