//! Forecast timestamp manifest and selection state.
//!
//! The manifest is a remote JSON document mapping timestamp strings to
//! resource URLs. It is fetched once and read-only afterwards.

use chrono::{DateTime, Utc};

/// One selectable forecast step.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Compact display label for the timeline
    pub label: String,
    /// GeoTIFF resource for this step
    pub url: String,
}

/// Parsed timestamp → URL manifest, ordered chronologically.
#[derive(Debug, Clone, Default)]
pub struct ForecastManifest {
    pub entries: Vec<ForecastEntry>,
}

impl ForecastManifest {
    /// Parses the manifest JSON: an object of RFC 3339 timestamps to URLs.
    ///
    /// Entries with unparseable timestamps are skipped with a warning;
    /// an empty document parses to an empty manifest (callers guard on it).
    pub fn parse(json: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| format!("invalid manifest JSON: {}", e))?;

        let map = value
            .as_object()
            .ok_or_else(|| "manifest is not a JSON object".to_string())?;

        let mut entries: Vec<ForecastEntry> = map
            .iter()
            .filter_map(|(key, url)| {
                let url = url.as_str()?.to_string();
                match DateTime::parse_from_rfc3339(key) {
                    Ok(ts) => {
                        let timestamp = ts.with_timezone(&Utc);
                        Some(ForecastEntry {
                            label: timestamp.format("%m/%d %H:%M").to_string(),
                            timestamp,
                            url,
                        })
                    }
                    Err(e) => {
                        log::warn!("Skipping manifest entry with bad timestamp {:?}: {}", key, e);
                        None
                    }
                }
            })
            .collect();

        entries.sort_by_key(|e| e.timestamp);
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Manifest loading and timeline selection state.
#[derive(Debug, Default)]
pub struct ForecastState {
    pub manifest: Option<ForecastManifest>,
    pub selected: Option<usize>,
    pub loading: bool,
}

impl ForecastState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a timeline step and returns its entry.
    pub fn select(&mut self, index: usize) -> Option<&ForecastEntry> {
        let entry = self.manifest.as_ref()?.entries.get(index)?;
        self.selected = Some(index);
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "2026-08-05T12:00:00Z": "https://data.example.org/t12.tif",
        "2026-08-05T06:00:00Z": "https://data.example.org/t06.tif",
        "2026-08-05T18:00:00Z": "https://data.example.org/t18.tif"
    }"#;

    #[test]
    fn test_parse_sorts_chronologically() {
        let manifest = ForecastManifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.entries.len(), 3);
        assert!(manifest.entries[0].url.ends_with("t06.tif"));
        assert!(manifest.entries[2].url.ends_with("t18.tif"));
        for pair in manifest.entries.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_bad_timestamps_skipped() {
        let manifest = ForecastManifest::parse(
            r#"{"not a timestamp": "https://x/a.tif", "2026-01-01T00:00:00Z": "https://x/b.tif"}"#,
        )
        .unwrap();
        assert_eq!(manifest.entries.len(), 1);
    }

    #[test]
    fn test_empty_manifest_parses_empty() {
        let manifest = ForecastManifest::parse("{}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ForecastManifest::parse("[1, 2, 3]").is_err());
        assert!(ForecastManifest::parse("not json").is_err());
    }

    #[test]
    fn test_selection() {
        let mut state = ForecastState::new();
        assert!(state.select(0).is_none());

        state.manifest = Some(ForecastManifest::parse(SAMPLE).unwrap());
        let url = state.select(1).map(|e| e.url.clone());
        assert!(url.unwrap().ends_with("t12.tif"));
        assert_eq!(state.selected, Some(1));
        assert!(state.select(99).is_none());
    }
}
