//! Application state management.
//!
//! This module contains all state structures used throughout the application.
//! State is organized into logical groupings that correspond to different
//! areas of functionality.

mod forecast;
mod layer;
mod status;
mod swipe;
mod visibility;
mod viz;

pub use forecast::{ForecastEntry, ForecastManifest, ForecastState};
pub use layer::{LayerData, LayerId, LayerKind, LayerNode, LayerRegistry, LayerSource, MapLayer};
pub use status::{StatusState, UserAlert};
pub use swipe::{SwipeSide, SwipeState};
pub use visibility::VisibleLayerTracker;
pub use viz::VizState;

use crate::config;

/// Root application state containing all sub-states.
pub struct AppState {
    /// All layers plus the TOC tree
    pub registry: LayerRegistry,

    /// Layer swipe comparison state
    pub swipe: SwipeState,

    /// Map view and cursor state
    pub viz: VizState,

    /// Forecast timeline state
    pub forecast: ForecastState,

    /// Status message and user alerts
    pub status: StatusState,

    /// The raster layer driven by the forecast timeline
    pub forecast_layer: LayerId,
}

impl AppState {
    pub fn new() -> Self {
        let setup = config::demo_setup();
        Self {
            registry: setup.registry,
            swipe: SwipeState::new(),
            viz: VizState::new(),
            forecast: ForecastState::new(),
            status: StatusState::new(),
            forecast_layer: setup.forecast_layer,
        }
    }
}
