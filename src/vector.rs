//! Vector feature model and GeoJSON parsing.

use geo_types::Coord;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

/// A vector feature that can be rendered on the canvas.
#[derive(Debug, Clone)]
pub enum VectorFeature {
    /// A single point with an optional label
    Point(Coord<f64>, Option<String>),
    /// A series of connected line segments
    LineString(Vec<Coord<f64>>),
    /// Multiple line strings
    MultiLineString(Vec<Vec<Coord<f64>>>),
    /// A closed polygon with optional label
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
        label: Option<String>,
    },
    /// Multiple polygons with optional label
    MultiPolygon {
        polygons: Vec<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)>,
        label: Option<String>,
    },
}

/// Decoded vector payload for a layer.
#[derive(Debug, Clone, Default)]
pub struct VectorData {
    pub features: Vec<VectorFeature>,
}

impl VectorData {
    /// Parses a GeoJSON document into renderable features.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, String> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?;

        let mut data = VectorData::default();
        match geojson {
            GeoJson::FeatureCollection(fc) => data.push_feature_collection(fc),
            GeoJson::Feature(f) => {
                if let Some(feature) = convert_feature(&f) {
                    data.features.push(feature);
                }
            }
            GeoJson::Geometry(g) => {
                if let Some(feature) = convert_geometry(&g, None) {
                    data.features.push(feature);
                }
            }
        }
        Ok(data)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn push_feature_collection(&mut self, fc: FeatureCollection) {
        for feature in fc.features {
            if let Some(converted) = convert_feature(&feature) {
                self.features.push(converted);
            }
        }
    }
}

fn convert_feature(feature: &Feature) -> Option<VectorFeature> {
    let label = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    feature
        .geometry
        .as_ref()
        .and_then(|g| convert_geometry(g, label))
}

fn coord(c: &[f64]) -> Coord<f64> {
    Coord { x: c[0], y: c[1] }
}

fn convert_geometry(geometry: &Geometry, label: Option<String>) -> Option<VectorFeature> {
    match &geometry.value {
        Value::Point(coords) => Some(VectorFeature::Point(coord(coords), label)),
        Value::MultiPoint(points) => {
            // Represent a multipoint by its first position
            points
                .first()
                .map(|coords| VectorFeature::Point(coord(coords), label))
        }
        Value::LineString(coords) => Some(VectorFeature::LineString(
            coords.iter().map(|c| coord(c)).collect(),
        )),
        Value::MultiLineString(lines) => Some(VectorFeature::MultiLineString(
            lines
                .iter()
                .map(|line| line.iter().map(|c| coord(c)).collect())
                .collect(),
        )),
        Value::Polygon(rings) => {
            if rings.is_empty() {
                return None;
            }
            let exterior = rings[0].iter().map(|c| coord(c)).collect();
            let holes = rings[1..]
                .iter()
                .map(|ring| ring.iter().map(|c| coord(c)).collect())
                .collect();
            Some(VectorFeature::Polygon {
                exterior,
                holes,
                label,
            })
        }
        Value::MultiPolygon(polygons) => {
            let polygons: Vec<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)> = polygons
                .iter()
                .filter_map(|rings| {
                    if rings.is_empty() {
                        return None;
                    }
                    let exterior: Vec<Coord<f64>> = rings[0].iter().map(|c| coord(c)).collect();
                    let holes: Vec<Vec<Coord<f64>>> = rings[1..]
                        .iter()
                        .map(|ring| ring.iter().map(|c| coord(c)).collect())
                        .collect();
                    Some((exterior, holes))
                })
                .collect();
            Some(VectorFeature::MultiPolygon { polygons, label })
        }
        Value::GeometryCollection(geometries) => {
            // Take the first convertible geometry
            for g in geometries {
                if let Some(feature) = convert_geometry(g, label.clone()) {
                    return Some(feature);
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Altstadt" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[6.95, 50.93], [6.97, 50.93], [6.97, 50.95], [6.95, 50.93]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": { "type": "Point", "coordinates": [6.96, 50.94] }
                }
            ]
        }"#;

        let data = VectorData::from_geojson(json).unwrap();
        assert_eq!(data.features.len(), 2);

        match &data.features[0] {
            VectorFeature::Polygon {
                exterior, label, ..
            } => {
                assert_eq!(exterior.len(), 4);
                assert_eq!(label.as_deref(), Some("Altstadt"));
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_document() {
        assert!(VectorData::from_geojson("not json").is_err());
    }

    #[test]
    fn test_empty_collection() {
        let data =
            VectorData::from_geojson(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(data.is_empty());
    }
}
