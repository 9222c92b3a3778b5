//! Layer swipe comparison state.
//!
//! Holds the left/right layer selections and the slider position. When both
//! selections are set to distinct, existing layers the comparison activates
//! and both layers are forced visible; clearing either selection (or picking
//! the same layer twice) deactivates it. Nothing persists across sessions.

use eframe::egui::Rect;

use super::{LayerId, LayerRegistry};

/// Which half of the split a compared layer occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeSide {
    Left,
    Right,
}

#[derive(Debug)]
pub struct SwipeState {
    pub left: Option<LayerId>,
    pub right: Option<LayerId>,
    /// Slider position across the canvas (0.0 = far left, 1.0 = far right)
    pub position: f32,
    active: bool,
}

impl Default for SwipeState {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
            position: 0.5,
            active: false,
        }
    }
}

impl SwipeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Recomputes activation from the current selections and forces both
    /// compared layers visible while active. Call once per frame before
    /// visibility tracking.
    pub fn sync(&mut self, registry: &mut LayerRegistry) {
        let valid = match (self.left, self.right) {
            (Some(left), Some(right)) => {
                left != right && registry.get(left).is_some() && registry.get(right).is_some()
            }
            _ => false,
        };

        if valid && !self.active {
            log::info!("Layer comparison activated");
        } else if !valid && self.active {
            log::info!("Layer comparison deactivated");
        }
        self.active = valid;

        if self.active {
            // Comparing a hidden layer is meaningless; force both on.
            for id in [self.left, self.right].into_iter().flatten() {
                registry.set_visible(id, true);
            }
        }
    }

    /// The side a layer occupies in the active comparison, if any.
    pub fn side_of(&self, id: LayerId) -> Option<SwipeSide> {
        if !self.active {
            return None;
        }
        if self.left == Some(id) {
            Some(SwipeSide::Left)
        } else if self.right == Some(id) {
            Some(SwipeSide::Right)
        } else {
            None
        }
    }

    /// Splits the canvas rectangle at the slider position.
    pub fn split(&self, canvas: Rect) -> (Rect, Rect) {
        let x = canvas.left() + canvas.width() * self.position.clamp(0.0, 1.0);
        let left = Rect::from_min_max(canvas.left_top(), eframe::egui::pos2(x, canvas.bottom()));
        let right = Rect::from_min_max(eframe::egui::pos2(x, canvas.top()), canvas.right_bottom());
        (left, right)
    }

    /// Screen x of the divider within the canvas.
    pub fn divider_x(&self, canvas: Rect) -> f32 {
        canvas.left() + canvas.width() * self.position.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LayerSource, MapLayer};
    use eframe::egui::{pos2, vec2};

    fn two_layer_registry() -> (LayerRegistry, LayerId, LayerId) {
        let mut registry = LayerRegistry::new();
        let a = registry.insert(MapLayer::new("A", LayerSource::Osm));
        let b = registry.insert(MapLayer::new("B", LayerSource::Osm).with_visible(false));
        (registry, a, b)
    }

    #[test]
    fn test_distinct_selections_activate() {
        let (mut registry, a, b) = two_layer_registry();
        let mut swipe = SwipeState::new();

        swipe.left = Some(a);
        swipe.sync(&mut registry);
        assert!(!swipe.is_active());

        swipe.right = Some(b);
        swipe.sync(&mut registry);
        assert!(swipe.is_active());
    }

    #[test]
    fn test_clearing_either_deactivates() {
        let (mut registry, a, b) = two_layer_registry();
        let mut swipe = SwipeState::new();
        swipe.left = Some(a);
        swipe.right = Some(b);
        swipe.sync(&mut registry);
        assert!(swipe.is_active());

        swipe.left = None;
        swipe.sync(&mut registry);
        assert!(!swipe.is_active());
    }

    #[test]
    fn test_same_layer_both_sides_stays_inactive() {
        let (mut registry, a, _) = two_layer_registry();
        let mut swipe = SwipeState::new();
        swipe.left = Some(a);
        swipe.right = Some(a);
        swipe.sync(&mut registry);
        assert!(!swipe.is_active());
    }

    #[test]
    fn test_activation_forces_visibility() {
        let (mut registry, a, b) = two_layer_registry();
        assert!(!registry.get(b).unwrap().visible);

        let mut swipe = SwipeState::new();
        swipe.left = Some(a);
        swipe.right = Some(b);
        swipe.sync(&mut registry);

        assert!(registry.get(a).unwrap().visible);
        assert!(registry.get(b).unwrap().visible);
    }

    #[test]
    fn test_unknown_layer_id_is_invalid() {
        let (mut registry, a, _) = two_layer_registry();
        let mut swipe = SwipeState::new();
        swipe.left = Some(a);
        swipe.right = Some(LayerId(999));
        swipe.sync(&mut registry);
        assert!(!swipe.is_active());
    }

    #[test]
    fn test_split_at_position() {
        let mut swipe = SwipeState::new();
        swipe.position = 0.25;
        let canvas = Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0));
        let (left, right) = swipe.split(canvas);
        assert_eq!(left.right(), 100.0);
        assert_eq!(right.left(), 100.0);
        assert_eq!(left.height(), 300.0);
    }
}
