//! WMS `GetCapabilities` parsing and per-server limit caching.
//!
//! Only the advertised `MaxWidth`/`MaxHeight` are extracted; servers that
//! do not advertise limits fall back to a conservative default.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use super::append_query;

/// Fallback per-axis pixel limit when a server advertises none.
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Advertised output size limits of a WMS server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerLimits {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
        }
    }
}

#[derive(Debug, Error)]
pub enum CapabilitiesError {
    #[error("invalid capabilities XML: {0}")]
    Xml(String),
}

/// Builds the `GetCapabilities` URL for a WMS endpoint.
pub fn capabilities_url(base_url: &str) -> String {
    append_query(base_url, "service=WMS&version=1.3.0&request=GetCapabilities")
}

/// Extracts the size limits from a capabilities document.
///
/// The scan is namespace-tolerant and ignores everything except the
/// `MaxWidth`/`MaxHeight` elements; absent limits fall back per-axis to
/// [`DEFAULT_MAX_DIMENSION`].
pub fn parse_capabilities(xml: &str) -> Result<ServerLimits, CapabilitiesError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Field {
        Width,
        Height,
    }

    let mut reader = Reader::from_str(xml);
    let mut current: Option<Field> = None;
    let mut limits = ServerLimits::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"MaxWidth" => Some(Field::Width),
                    b"MaxHeight" => Some(Field::Height),
                    _ => None,
                };
            }
            Ok(Event::Text(t)) => {
                if let Some(field) = current {
                    let text = t
                        .unescape()
                        .map_err(|e| CapabilitiesError::Xml(e.to_string()))?;
                    if let Ok(value) = text.trim().parse::<u32>() {
                        match field {
                            Field::Width => limits.max_width = value,
                            Field::Height => limits.max_height = value,
                        }
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(CapabilitiesError::Xml(e.to_string())),
        }
    }

    Ok(limits)
}

/// Shared cache of parsed server limits, keyed by service base URL.
///
/// Cloned into download tasks so capabilities are fetched at most once per
/// server per session.
#[derive(Clone, Default)]
pub struct CapabilitiesCache {
    inner: Arc<Mutex<HashMap<String, ServerLimits>>>,
}

impl CapabilitiesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, base_url: &str) -> Option<ServerLimits> {
        self.inner.lock().ok()?.get(base_url).copied()
    }

    pub fn insert(&self, base_url: &str, limits: ServerLimits) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(base_url.to_string(), limits);
        }
    }
}
