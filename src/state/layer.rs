//! Map layer model and registry.
//!
//! The registry owns every layer, assigns identifiers, and exposes the
//! recursive layer tree shown in the TOC. Visibility mutations go through
//! the registry so it can bump its revision counter; the visibility tracker
//! recomputes whenever that counter moves.

use std::sync::Arc;

use crate::legend::ColorRamp;
use crate::raster::RasterGrid;
use crate::vector::VectorData;

/// Opaque layer identifier assigned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

/// Type tag determining how a layer renders, downloads, and answers queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    GeoTiff,
    GeoJson,
    WmsTiles,
    WmsFeatures,
    Osm,
}

impl LayerKind {
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::GeoTiff => "GeoTIFF",
            LayerKind::GeoJson => "GeoJSON",
            LayerKind::WmsTiles => "WMS",
            LayerKind::WmsFeatures => "WMS/WFS",
            LayerKind::Osm => "OSM",
        }
    }
}

/// Where a layer's data comes from.
#[derive(Debug, Clone)]
pub enum LayerSource {
    /// Georeferenced raster; either a direct file URL or a WCS coverage
    /// hosted at `url`.
    GeoTiff {
        url: String,
        coverage_id: Option<String>,
    },
    /// Remote GeoJSON document
    GeoJson { url: String },
    /// WMS layer rendered server-side as imagery
    WmsTiles { base_url: String, layer_name: String },
    /// WMS layer backed by vector features, exportable through WFS
    WmsFeatures {
        base_url: String,
        layer_name: String,
        feature_type: String,
    },
    /// OpenStreetMap base layer
    Osm,
}

impl LayerSource {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerSource::GeoTiff { .. } => LayerKind::GeoTiff,
            LayerSource::GeoJson { .. } => LayerKind::GeoJson,
            LayerSource::WmsTiles { .. } => LayerKind::WmsTiles,
            LayerSource::WmsFeatures { .. } => LayerKind::WmsFeatures,
            LayerSource::Osm => LayerKind::Osm,
        }
    }
}

/// Decoded payload attached to a layer once its fetch completes.
#[derive(Debug, Clone, Default)]
pub enum LayerData {
    #[default]
    Empty,
    Raster(Arc<RasterGrid>),
    Vector(Arc<VectorData>),
}

/// A single map layer.
#[derive(Debug, Clone)]
pub struct MapLayer {
    pub id: LayerId,
    pub title: String,
    pub visible: bool,
    pub opacity: f32,
    pub source: LayerSource,
    /// Color ramp used for raster rendering and the legend
    pub ramp: ColorRamp,
    /// Value range the ramp and legend span
    pub value_range: (f64, f64),
    pub data: LayerData,
    /// True while an async payload fetch is in flight
    pub loading: bool,
}

impl MapLayer {
    /// Creates a layer with defaults; the registry assigns the real id.
    pub fn new(title: impl Into<String>, source: LayerSource) -> Self {
        Self {
            id: LayerId(0),
            title: title.into(),
            visible: true,
            opacity: 1.0,
            source,
            ramp: ColorRamp::default(),
            value_range: (0.0, 1.0),
            data: LayerData::Empty,
            loading: false,
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_ramp(mut self, ramp: ColorRamp, value_range: (f64, f64)) -> Self {
        self.ramp = ramp;
        self.value_range = value_range;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn kind(&self) -> LayerKind {
        self.source.kind()
    }

    /// Decoded raster grid, if this layer has one.
    pub fn raster(&self) -> Option<&Arc<RasterGrid>> {
        match &self.data {
            LayerData::Raster(grid) => Some(grid),
            _ => None,
        }
    }

    /// Decoded vector features, if this layer has them.
    pub fn vector(&self) -> Option<&Arc<VectorData>> {
        match &self.data {
            LayerData::Vector(data) => Some(data),
            _ => None,
        }
    }
}

/// A node in the TOC layer tree: either a group or a layer leaf.
#[derive(Debug, Clone)]
pub enum LayerNode {
    Group {
        title: String,
        children: Vec<LayerNode>,
    },
    Layer(LayerId),
}

/// Owner of all layers and the TOC tree.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: Vec<MapLayer>,
    tree: Vec<LayerNode>,
    next_id: u32,
    revision: u64,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer without placing it in the tree. Returns its id.
    pub fn insert(&mut self, mut layer: MapLayer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        layer.id = id;
        self.layers.push(layer);
        self.revision += 1;
        id
    }

    /// Appends a group node containing the given layers to the tree root.
    pub fn add_group(&mut self, title: impl Into<String>, ids: Vec<LayerId>) {
        self.tree.push(LayerNode::Group {
            title: title.into(),
            children: ids.into_iter().map(LayerNode::Layer).collect(),
        });
    }

    /// Appends a bare layer node to the tree root.
    pub fn add_root_layer(&mut self, id: LayerId) {
        self.tree.push(LayerNode::Layer(id));
    }

    pub fn get(&self, id: LayerId) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Mutable access for payload/loading updates.
    ///
    /// Visibility must go through [`set_visible`](Self::set_visible) so the
    /// revision counter stays accurate.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut MapLayer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Sets a layer's visibility flag, bumping the revision on change.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) {
            if layer.visible != visible {
                layer.visible = visible;
                self.revision += 1;
            }
        }
    }

    pub fn toggle_visible(&mut self, id: LayerId) {
        if let Some(visible) = self.get(id).map(|l| l.visible) {
            self.set_visible(id, !visible);
        }
    }

    /// Sets a layer's opacity (no revision bump; visibility is unaffected).
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        if let Some(layer) = self.get_mut(id) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Swaps the color ramp a raster layer renders through.
    pub fn set_ramp(&mut self, id: LayerId, ramp: ColorRamp) {
        if let Some(layer) = self.get_mut(id) {
            layer.ramp = ramp;
        }
    }

    /// Monotonic counter bumped on every membership or visibility change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Root nodes of the TOC tree.
    pub fn tree(&self) -> &[LayerNode] {
        &self.tree
    }

    /// All layers in insertion order (bottom-most paint order first).
    pub fn layers(&self) -> impl Iterator<Item = &MapLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_unique_ids() {
        let mut registry = LayerRegistry::new();
        let a = registry.insert(MapLayer::new("A", LayerSource::Osm));
        let b = registry.insert(MapLayer::new("B", LayerSource::Osm));
        assert_ne!(a, b);
        assert_eq!(registry.get(a).unwrap().title, "A");
        assert_eq!(registry.get(b).unwrap().title, "B");
    }

    #[test]
    fn test_set_visible_bumps_revision_only_on_change() {
        let mut registry = LayerRegistry::new();
        let id = registry.insert(MapLayer::new("A", LayerSource::Osm));

        let before = registry.revision();
        registry.set_visible(id, false);
        assert_eq!(registry.revision(), before + 1);

        // No-op toggle does not bump.
        registry.set_visible(id, false);
        assert_eq!(registry.revision(), before + 1);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut registry = LayerRegistry::new();
        let id = registry.insert(MapLayer::new("A", LayerSource::Osm));
        registry.set_opacity(id, 3.0);
        assert_eq!(registry.get(id).unwrap().opacity, 1.0);
    }
}
