//! Feature and pixel info queries for map clicks.
//!
//! A click fans out one `GetFeatureInfo` request per visible WMS layer and
//! reads raster values straight from decoded grids. All settled results are
//! aggregated into a single batch keyed by layer title; a per-click sequence
//! number lets the app drop batches superseded by a newer click.

use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui::{self, Pos2};
use geojson::GeoJson;

use crate::geo::MapView;
use crate::ogc::wms;
use crate::state::{LayerId, LayerRegistry, LayerSource};

/// Information resolved for one layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    /// Formatted attribute lines, one per feature
    Features(Vec<String>),
    /// Raster value at the clicked position
    Pixel(f64),
    /// The layer had nothing at the clicked position
    Empty,
}

/// One row of the popup: the layer and what it reported.
///
/// `value` is None when the layer's request failed (the error is logged and
/// swallowed so other layers still report).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInfoResult {
    pub layer_title: String,
    pub value: Option<InfoValue>,
}

/// A full batch of results for one click.
#[derive(Debug, Clone)]
pub struct InfoResponse {
    pub seq: u64,
    pub results: Vec<LayerInfoResult>,
}

/// What must happen to answer the query for one layer.
#[derive(Debug, Clone, PartialEq)]
enum InfoRequest {
    /// Fetch and parse a WMS GetFeatureInfo response
    Wms { url: String },
    /// Raster value already sampled on the UI thread from the decoded grid
    Raster { value: Option<f64> },
}

/// One unit of work for the click.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoTask {
    layer_title: String,
    request: InfoRequest,
}

/// Builds the per-layer tasks for a click at `click_pos` (screen space).
///
/// WMS-backed layers get a `GetFeatureInfo` URL for the current view;
/// raster layers are sampled immediately. Other layer kinds are not
/// queryable and are skipped.
pub fn build_tasks(
    registry: &LayerRegistry,
    visible: &[LayerId],
    view: &MapView,
    click_pos: Pos2,
) -> Vec<InfoTask> {
    let bbox = view.visible_bbox();
    let width = view.screen_rect.width().max(1.0) as u32;
    let height = view.screen_rect.height().max(1.0) as u32;
    let i = (click_pos.x - view.screen_rect.left()).max(0.0) as u32;
    let j = (click_pos.y - view.screen_rect.top()).max(0.0) as u32;
    let geo = view.screen_to_geo(click_pos);

    visible
        .iter()
        .filter_map(|id| registry.get(*id))
        .filter_map(|layer| {
            let request = match &layer.source {
                LayerSource::WmsTiles {
                    base_url,
                    layer_name,
                }
                | LayerSource::WmsFeatures {
                    base_url,
                    layer_name,
                    ..
                } => InfoRequest::Wms {
                    url: wms::get_feature_info_url(
                        base_url, layer_name, &bbox, width, height, i, j,
                    ),
                },
                LayerSource::GeoTiff { .. } => InfoRequest::Raster {
                    value: layer
                        .raster()
                        .and_then(|grid| grid.sample(geo.x, geo.y))
                        .map(f64::from),
                },
                LayerSource::GeoJson { .. } | LayerSource::Osm => return None,
            };
            Some(InfoTask {
                layer_title: layer.title.clone(),
                request,
            })
        })
        .collect()
}

/// Formats a GetFeatureInfo GeoJSON body into attribute lines.
pub fn parse_feature_collection(body: &str) -> Result<InfoValue, String> {
    let geojson: GeoJson = body
        .parse()
        .map_err(|e| format!("invalid GetFeatureInfo response: {}", e))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    };

    if features.is_empty() {
        return Ok(InfoValue::Empty);
    }

    let lines = features
        .iter()
        .map(|feature| {
            let attributes: Vec<String> = feature
                .properties
                .iter()
                .flatten()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| match value.as_str() {
                    Some(s) => format!("{}: {}", key, s),
                    None => format!("{}: {}", key, value),
                })
                .collect();
            if attributes.is_empty() {
                "(no attributes)".to_string()
            } else {
                attributes.join(", ")
            }
        })
        .collect();

    Ok(InfoValue::Features(lines))
}

fn resolve_raster(value: Option<f64>) -> Option<InfoValue> {
    Some(match value {
        Some(v) => InfoValue::Pixel(v),
        None => InfoValue::Empty,
    })
}

/// Channel bridging click queries back into the UI thread.
pub struct FeatureInfoChannel {
    sender: Sender<InfoResponse>,
    receiver: Receiver<InfoResponse>,
}

impl Default for FeatureInfoChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureInfoChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Resolves the click's tasks off-thread and delivers one aggregated
    /// batch. Per-layer failures are logged and reported as None.
    pub fn query(&self, ctx: egui::Context, seq: u64, tasks: Vec<InfoTask>) {
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let results = tasks.into_iter().map(resolve_task).collect();
            let _ = sender.send(InfoResponse { seq, results });
            ctx.request_repaint();
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let futures: Vec<_> = tasks.into_iter().map(resolve_task).collect();
            let results = futures_util::future::join_all(futures).await;
            let _ = sender.send(InfoResponse { seq, results });
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed batch.
    pub fn try_recv(&self) -> Option<InfoResponse> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn resolve_task(task: InfoTask) -> LayerInfoResult {
    let value = match task.request {
        InfoRequest::Raster { value } => resolve_raster(value),
        InfoRequest::Wms { url } => match crate::net::fetch_text(&url) {
            Ok(body) => match parse_feature_collection(&body) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Feature info for {:?} unusable: {}", task.layer_title, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Feature info for {:?} failed: {}", task.layer_title, e);
                None
            }
        },
    };
    LayerInfoResult {
        layer_title: task.layer_title,
        value,
    }
}

#[cfg(target_arch = "wasm32")]
async fn resolve_task(task: InfoTask) -> LayerInfoResult {
    let value = match task.request {
        InfoRequest::Raster { value } => resolve_raster(value),
        InfoRequest::Wms { url } => match crate::net::fetch_text(&url).await {
            Ok(body) => match parse_feature_collection(&body) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Feature info for {:?} unusable: {}", task.layer_title, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Feature info for {:?} failed: {}", task.layer_title, e);
                None
            }
        },
    };
    LayerInfoResult {
        layer_title: task.layer_title,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{GeoTransform, RasterGrid};
    use crate::state::{LayerData, MapLayer};
    use std::sync::Arc;

    fn click_setup() -> (LayerRegistry, Vec<LayerId>, MapView) {
        let mut registry = LayerRegistry::new();

        let wms = registry.insert(MapLayer::new(
            "Land Use",
            LayerSource::WmsTiles {
                base_url: "https://example.org/ows".into(),
                layer_name: "demo:landuse".into(),
            },
        ));

        // Grid covering the default view center (6.96, 50.94) with value 21.5.
        let grid = RasterGrid::new(
            4,
            4,
            vec![21.5; 16],
            GeoTransform {
                origin_x: 6.9,
                origin_y: 51.0,
                pixel_width: 0.05,
                pixel_height: 0.05,
            },
            None,
        )
        .unwrap();
        let mut raster_layer = MapLayer::new(
            "Air Temperature",
            LayerSource::GeoTiff {
                url: "https://example.org/ows".into(),
                coverage_id: Some("demo__temperature".into()),
            },
        );
        raster_layer.data = LayerData::Raster(Arc::new(grid));
        let raster = registry.insert(raster_layer);

        let vector = registry.insert(MapLayer::new(
            "City Districts",
            LayerSource::GeoJson {
                url: "https://example.org/districts.geojson".into(),
            },
        ));

        (registry, vec![wms, raster, vector], MapView::default())
    }

    #[test]
    fn test_build_tasks_skips_unqueryable_layers() {
        let (registry, visible, view) = click_setup();
        let tasks = build_tasks(&registry, &visible, &view, view.screen_rect.center());
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].layer_title, "Land Use");
        assert_eq!(tasks[1].layer_title, "Air Temperature");
    }

    #[test]
    fn test_build_tasks_samples_raster_at_click() {
        let (registry, visible, view) = click_setup();
        let tasks = build_tasks(&registry, &visible, &view, view.screen_rect.center());
        match &tasks[1].request {
            InfoRequest::Raster { value } => assert_eq!(*value, Some(21.5)),
            other => panic!("expected raster request, got {:?}", other),
        }
    }

    #[test]
    fn test_build_tasks_wms_url_carries_click_pixel() {
        let (registry, visible, view) = click_setup();
        let click = Pos2::new(
            view.screen_rect.left() + 120.0,
            view.screen_rect.top() + 45.0,
        );
        let tasks = build_tasks(&registry, &visible, &view, click);
        match &tasks[0].request {
            InfoRequest::Wms { url } => {
                assert!(url.contains("request=GetFeatureInfo"));
                assert!(url.contains("i=120"));
                assert!(url.contains("j=45"));
            }
            other => panic!("expected WMS request, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_feature_collection_lines() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Station 4", "temp": 17.2 },
                    "geometry": null
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": null
                }
            ]
        }"#;
        match parse_feature_collection(body).unwrap() {
            InfoValue::Features(lines) => {
                assert_eq!(lines.len(), 2);
                assert!(lines[0].contains("name: Station 4"));
                assert!(lines[0].contains("temp: 17.2"));
                assert_eq!(lines[1], "(no attributes)");
            }
            other => panic!("expected features, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_collection() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        assert_eq!(parse_feature_collection(body).unwrap(), InfoValue::Empty);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(parse_feature_collection("<ServiceException/>").is_err());
    }

    #[test]
    fn test_raster_miss_reports_empty() {
        assert_eq!(resolve_raster(None), Some(InfoValue::Empty));
        assert_eq!(resolve_raster(Some(3.5)), Some(InfoValue::Pixel(3.5)));
    }
}
