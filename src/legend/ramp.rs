//! Color stop and ramp definitions.

use eframe::egui::Color32;

/// A single stop in a color ramp.
///
/// `position` is the stop's location in the ramp's normalized 0..1 domain.
/// Stops are static configuration data and never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    /// Normalized threshold position (0.0 = range minimum, 1.0 = maximum)
    pub position: f64,
    /// Swatch color at this stop
    pub color: Color32,
    /// Short display label for the stop
    pub label: &'static str,
    /// Optional opacity override (0.0 - 1.0); None means fully opaque
    pub opacity: Option<f32>,
}

impl ColorStop {
    const fn new(position: f64, color: Color32, label: &'static str) -> Self {
        Self {
            position,
            color,
            label,
            opacity: None,
        }
    }
}

/// Available color ramps for raster rendering and legends.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRamp {
    #[default]
    Temperature,
    Precipitation,
    Elevation,
    Monochrome,
}

/// Blue through green and yellow to deep red, 6 stops.
const TEMPERATURE_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, Color32::from_rgb(49, 54, 149), "cold"),
    ColorStop::new(0.2, Color32::from_rgb(69, 117, 180), "cool"),
    ColorStop::new(0.4, Color32::from_rgb(171, 217, 233), "mild"),
    ColorStop::new(0.6, Color32::from_rgb(254, 224, 144), "warm"),
    ColorStop::new(0.8, Color32::from_rgb(244, 109, 67), "hot"),
    ColorStop::new(1.0, Color32::from_rgb(165, 0, 38), "extreme"),
];

const PRECIPITATION_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, Color32::from_rgb(247, 251, 255), "none"),
    ColorStop::new(0.25, Color32::from_rgb(198, 219, 239), "light"),
    ColorStop::new(0.5, Color32::from_rgb(107, 174, 214), "moderate"),
    ColorStop::new(0.75, Color32::from_rgb(33, 113, 181), "heavy"),
    ColorStop::new(1.0, Color32::from_rgb(8, 48, 107), "intense"),
];

const ELEVATION_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, Color32::from_rgb(0, 97, 71), "lowland"),
    ColorStop::new(0.2, Color32::from_rgb(120, 171, 48), "plain"),
    ColorStop::new(0.4, Color32::from_rgb(230, 216, 122), "hills"),
    ColorStop::new(0.6, Color32::from_rgb(171, 119, 61), "upland"),
    ColorStop::new(0.8, Color32::from_rgb(130, 90, 80), "mountain"),
    ColorStop::new(1.0, Color32::from_rgb(245, 245, 245), "peak"),
];

const MONOCHROME_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, Color32::from_rgb(20, 20, 20), "low"),
    ColorStop::new(1.0, Color32::from_rgb(235, 235, 235), "high"),
];

impl ColorRamp {
    pub fn label(&self) -> &'static str {
        match self {
            ColorRamp::Temperature => "Temperature",
            ColorRamp::Precipitation => "Precipitation",
            ColorRamp::Elevation => "Elevation",
            ColorRamp::Monochrome => "Monochrome",
        }
    }

    pub fn all() -> &'static [ColorRamp] {
        &[
            ColorRamp::Temperature,
            ColorRamp::Precipitation,
            ColorRamp::Elevation,
            ColorRamp::Monochrome,
        ]
    }

    /// The ordered stop list backing this ramp.
    pub fn stops(&self) -> &'static [ColorStop] {
        match self {
            ColorRamp::Temperature => TEMPERATURE_STOPS,
            ColorRamp::Precipitation => PRECIPITATION_STOPS,
            ColorRamp::Elevation => ELEVATION_STOPS,
            ColorRamp::Monochrome => MONOCHROME_STOPS,
        }
    }

    /// Number of equal increments the legend splits a value range into.
    pub fn increments(&self) -> usize {
        self.stops().len()
    }
}

/// Maps a data value within `[min, max]` onto the ramp by linear
/// interpolation between the surrounding stops.
///
/// Values outside the range clamp to the end stops. A degenerate range
/// (min >= max) yields the first stop's color.
pub fn color_for_value(ramp: ColorRamp, min: f64, max: f64, value: f64) -> Color32 {
    let stops = ramp.stops();
    if stops.is_empty() {
        return Color32::TRANSPARENT;
    }
    if max <= min {
        return apply_opacity(stops[0]);
    }

    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);

    let mut lower = stops[0];
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.position && t <= b.position {
            let span = b.position - a.position;
            let f = if span > 0.0 { (t - a.position) / span } else { 0.0 };
            return lerp_color(a, b, f as f32);
        }
        lower = b;
    }
    apply_opacity(lower)
}

fn apply_opacity(stop: ColorStop) -> Color32 {
    match stop.opacity {
        Some(alpha) => stop.color.gamma_multiply(alpha),
        None => stop.color,
    }
}

fn lerp_color(a: ColorStop, b: ColorStop, f: f32) -> Color32 {
    let ca = apply_opacity(a);
    let cb = apply_opacity(b);
    let lerp = |x: u8, y: u8| -> u8 { (x as f32 + (y as f32 - x as f32) * f).round() as u8 };
    Color32::from_rgba_unmultiplied(
        lerp(ca.r(), cb.r()),
        lerp(ca.g(), cb.g()),
        lerp(ca.b(), cb.b()),
        lerp(ca.a(), cb.a()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_at_range_ends() {
        let low = color_for_value(ColorRamp::Temperature, -10.0, 40.0, -10.0);
        let high = color_for_value(ColorRamp::Temperature, -10.0, 40.0, 40.0);
        assert_eq!(low, TEMPERATURE_STOPS[0].color);
        assert_eq!(high, TEMPERATURE_STOPS[5].color);
    }

    #[test]
    fn test_color_clamps_outside_range() {
        let below = color_for_value(ColorRamp::Monochrome, 0.0, 1.0, -5.0);
        let above = color_for_value(ColorRamp::Monochrome, 0.0, 1.0, 5.0);
        assert_eq!(below, MONOCHROME_STOPS[0].color);
        assert_eq!(above, MONOCHROME_STOPS[1].color);
    }

    #[test]
    fn test_color_interpolates_between_stops() {
        // Halfway along the monochrome ramp: midpoint gray.
        let mid = color_for_value(ColorRamp::Monochrome, 0.0, 100.0, 50.0);
        assert_eq!(mid.r(), mid.g());
        assert_eq!(mid.g(), mid.b());
        assert!(mid.r() > 100 && mid.r() < 160);
    }

    #[test]
    fn test_degenerate_range() {
        let c = color_for_value(ColorRamp::Temperature, 5.0, 5.0, 5.0);
        assert_eq!(c, TEMPERATURE_STOPS[0].color);
    }
}
