//! Visualization state: the map view plus cursor bookkeeping.

use geo_types::Coord;

use crate::geo::MapView;

/// View state for the map canvas.
#[derive(Debug, Default)]
pub struct VizState {
    /// Current map view (center, zoom, pan, canvas rect)
    pub view: MapView,

    /// Geographic coordinate under the cursor, for the top bar readout
    pub hover_coord: Option<Coord<f64>>,

    /// Show the lon/lat graticule over the base map
    pub show_graticule: bool,
}

impl VizState {
    pub fn new() -> Self {
        Self {
            show_graticule: true,
            ..Default::default()
        }
    }

    /// Formatted cursor position for the status readout.
    pub fn hover_label(&self) -> String {
        match self.hover_coord {
            Some(c) => format!("{:.4}, {:.4}", c.x, c.y),
            None => "--".to_string(),
        }
    }
}
