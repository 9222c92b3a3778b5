//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for secondary labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Emphasized color for active states.
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 180, 255);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// Error/destructive indicator.
    pub const ERROR: Color32 = Color32::from_rgb(255, 90, 90);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Canvas background outside the basemap.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
    /// Flat basemap land fill.
    pub const BASEMAP: Color32 = Color32::from_rgb(38, 42, 54);
    /// Attribution text.
    pub const ATTRIBUTION: Color32 = Color32::from_rgb(120, 120, 140);
    /// Vector feature stroke.
    pub const VECTOR_STROKE: Color32 = Color32::from_rgb(120, 170, 220);
    /// Vector feature label.
    pub const VECTOR_LABEL: Color32 = Color32::from_rgb(200, 210, 230);

    /// Graticule line color - requires alpha, use function.
    pub fn graticule() -> Color32 {
        Color32::from_rgba_unmultiplied(90, 100, 110, 90)
    }

    /// Vector polygon fill - requires alpha, use function.
    pub fn vector_fill() -> Color32 {
        Color32::from_rgba_unmultiplied(80, 140, 200, 40)
    }
}

/// Colors for the swipe comparison overlay.
pub mod swipe {
    use super::Color32;

    /// Divider line between the compared layers.
    pub const DIVIDER: Color32 = Color32::from_rgb(240, 240, 240);
    /// Divider drag handle fill.
    pub const HANDLE: Color32 = Color32::from_rgb(70, 130, 190);
}

/// Colors for the legend panel.
pub mod legend {
    use super::Color32;

    /// Border around legend swatches.
    pub const SWATCH_BORDER: Color32 = Color32::from_rgb(80, 80, 95);
}
