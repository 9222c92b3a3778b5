//! Build-time service configuration and the demo layer set.
//!
//! Base URLs are baked in at compile time; there is no runtime
//! configuration surface.

use crate::state::{LayerId, LayerRegistry, LayerSource, MapLayer};
use crate::legend::ColorRamp;

/// OGC endpoint (WMS/WFS/WCS) of the demo GeoServer.
pub const OGC_BASE_URL: &str = "https://maps.maplab-demo.org/geoserver/ows";

/// Remote manifest mapping forecast timestamps to GeoTIFF URLs.
pub const FORECAST_MANIFEST_URL: &str = "https://data.maplab-demo.org/forecast/timestamps.json";

/// Static GeoJSON document with the demo city districts.
pub const DISTRICTS_GEOJSON_URL: &str = "https://data.maplab-demo.org/vector/districts.geojson";

/// Fallback coverage used before a forecast timestamp is selected.
pub const FORECAST_COVERAGE_ID: &str = "maplab__air_temperature";

/// The demo workbench configuration: layers plus the TOC tree.
pub struct DemoSetup {
    pub registry: LayerRegistry,
    /// The raster layer driven by the forecast timeline.
    pub forecast_layer: LayerId,
}

/// Builds the demo layer registry.
pub fn demo_setup() -> DemoSetup {
    let mut registry = LayerRegistry::new();

    let osm = registry.insert(MapLayer::new("OpenStreetMap", LayerSource::Osm));

    let landuse = registry.insert(
        MapLayer::new(
            "Land Use",
            LayerSource::WmsTiles {
                base_url: OGC_BASE_URL.to_string(),
                layer_name: "maplab:landuse".to_string(),
            },
        )
        .with_visible(false),
    );

    let stations = registry.insert(MapLayer::new(
        "Monitoring Stations",
        LayerSource::WmsFeatures {
            base_url: OGC_BASE_URL.to_string(),
            layer_name: "maplab:stations".to_string(),
            feature_type: "maplab:stations".to_string(),
        },
    ));

    let districts = registry.insert(MapLayer::new(
        "City Districts",
        LayerSource::GeoJson {
            url: DISTRICTS_GEOJSON_URL.to_string(),
        },
    ));

    let forecast = registry.insert(
        MapLayer::new(
            "Air Temperature Forecast",
            LayerSource::GeoTiff {
                url: OGC_BASE_URL.to_string(),
                coverage_id: Some(FORECAST_COVERAGE_ID.to_string()),
            },
        )
        .with_ramp(ColorRamp::Temperature, (-10.0, 40.0))
        .with_opacity(0.8),
    );

    registry.add_root_layer(osm);
    registry.add_group("Overlays", vec![landuse, stations, districts]);
    registry.add_group("Forecast", vec![forecast]);

    DemoSetup {
        registry,
        forecast_layer: forecast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_setup_layer_count() {
        let setup = demo_setup();
        assert_eq!(setup.registry.len(), 5);
        assert!(setup.registry.get(setup.forecast_layer).is_some());
    }
}
