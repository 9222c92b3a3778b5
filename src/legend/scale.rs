//! Legend scale construction.

use eframe::egui::Color32;

use super::{color_for_value, ColorRamp};

/// A single legend row: a formatted value label and its swatch color.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color32,
}

/// Builds the legend for a value range over a ramp.
///
/// The range is split into N equal increments (N = the ramp's stop count),
/// producing N+1 entries. Labels are formatted to two decimals, increase
/// monotonically, and span exactly `[min, max]`. Deterministic, no side
/// effects.
pub fn legend_entries(min: f64, max: f64, ramp: ColorRamp) -> Vec<LegendEntry> {
    let steps = ramp.increments();
    if steps == 0 {
        return Vec::new();
    }

    (0..=steps)
        .map(|i| {
            let value = min + (max - min) * (i as f64) / (steps as f64);
            LegendEntry {
                label: format!("{:.2}", value),
                color: color_for_value(ramp, min, max, value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_stop_ramp_over_0_100() {
        let entries = legend_entries(0.0, 100.0, ColorRamp::Temperature);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["0.00", "16.67", "33.33", "50.00", "66.67", "83.33", "100.00"]
        );
    }

    #[test]
    fn test_labels_monotonic_and_spanning() {
        let entries = legend_entries(-10.0, 40.0, ColorRamp::Elevation);
        let values: Vec<f64> = entries
            .iter()
            .map(|e| e.label.parse::<f64>().unwrap())
            .collect();

        assert_eq!(*values.first().unwrap(), -10.0);
        assert_eq!(*values.last().unwrap(), 40.0);
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_entry_count_is_increments_plus_one() {
        for ramp in ColorRamp::all() {
            let entries = legend_entries(0.0, 1.0, *ramp);
            assert_eq!(entries.len(), ramp.increments() + 1);
        }
    }

    #[test]
    fn test_even_spacing() {
        let entries = legend_entries(0.0, 50.0, ColorRamp::Precipitation);
        let values: Vec<f64> = entries
            .iter()
            .map(|e| e.label.parse::<f64>().unwrap())
            .collect();
        let step = values[1] - values[0];
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 0.011);
        }
    }
}
