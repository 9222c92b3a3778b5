//! Visible-layer tracking.
//!
//! Recomputes the flat list of currently visible layers from the recursive
//! TOC tree whenever the registry's revision counter moves. Group nodes are
//! organizational only and never appear in the result.

use super::{LayerId, LayerNode, LayerRegistry};

/// Tracks the subset of layers with `visible == true`.
#[derive(Debug, Default)]
pub struct VisibleLayerTracker {
    seen_revision: Option<u64>,
    visible: Vec<LayerId>,
}

impl VisibleLayerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the visible list if the registry changed since the last
    /// call. Returns true when the list was rebuilt.
    pub fn update(&mut self, registry: &LayerRegistry) -> bool {
        if self.seen_revision == Some(registry.revision()) {
            return false;
        }

        self.visible.clear();
        collect_visible(registry, registry.tree(), &mut self.visible);
        self.seen_revision = Some(registry.revision());

        log::debug!("Visible layers recomputed: {} entries", self.visible.len());
        true
    }

    /// Currently visible layer ids in tree order.
    pub fn visible(&self) -> &[LayerId] {
        &self.visible
    }

    #[allow(dead_code)] // Convenience lookup used by tests
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.visible.contains(&id)
    }
}

fn collect_visible(registry: &LayerRegistry, nodes: &[LayerNode], out: &mut Vec<LayerId>) {
    for node in nodes {
        match node {
            LayerNode::Group { children, .. } => collect_visible(registry, children, out),
            LayerNode::Layer(id) => {
                if registry.get(*id).is_some_and(|l| l.visible) {
                    out.push(*id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LayerSource, MapLayer};

    fn registry_with_tree() -> (LayerRegistry, LayerId, LayerId, LayerId) {
        let mut registry = LayerRegistry::new();
        let base = registry.insert(MapLayer::new("Base", LayerSource::Osm));
        let overlay = registry.insert(MapLayer::new(
            "Overlay",
            LayerSource::WmsTiles {
                base_url: "https://example.org/ows".into(),
                layer_name: "demo:overlay".into(),
            },
        ));
        let hidden = registry.insert(
            MapLayer::new(
                "Hidden",
                LayerSource::GeoJson {
                    url: "https://example.org/data.geojson".into(),
                },
            )
            .with_visible(false),
        );
        registry.add_root_layer(base);
        registry.add_group("Overlays", vec![overlay, hidden]);
        (registry, base, overlay, hidden)
    }

    #[test]
    fn test_groups_excluded_leaves_collected() {
        let (registry, base, overlay, hidden) = registry_with_tree();
        let mut tracker = VisibleLayerTracker::new();

        assert!(tracker.update(&registry));
        assert_eq!(tracker.visible(), &[base, overlay]);
        assert!(!tracker.is_visible(hidden));
    }

    #[test]
    fn test_toggle_reflected_on_next_recompute() {
        let (mut registry, base, overlay, hidden) = registry_with_tree();
        let mut tracker = VisibleLayerTracker::new();
        tracker.update(&registry);

        registry.set_visible(hidden, true);
        assert!(tracker.update(&registry));
        assert_eq!(tracker.visible(), &[base, overlay, hidden]);

        registry.set_visible(overlay, false);
        assert!(tracker.update(&registry));
        assert_eq!(tracker.visible(), &[base, hidden]);
    }

    #[test]
    fn test_no_recompute_without_change() {
        let (registry, ..) = registry_with_tree();
        let mut tracker = VisibleLayerTracker::new();

        assert!(tracker.update(&registry));
        assert!(!tracker.update(&registry));
    }

    #[test]
    fn test_empty_registry_yields_empty_list() {
        let registry = LayerRegistry::new();
        let mut tracker = VisibleLayerTracker::new();
        tracker.update(&registry);
        assert!(tracker.visible().is_empty());
    }
}
