//! Layer export downloads.
//!
//! Strategy selection is a pure function over the layer's type tag so it can
//! be tested without I/O. Execution happens off-thread and reports back
//! through a channel, bridging async downloads with egui's synchronous
//! update loop.

mod save;

use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui;

use crate::geo::{BBox, MapView};
use crate::ogc::capabilities::{self, CapabilitiesCache, ServerLimits};
use crate::ogc::{wcs, wfs, wms};
use crate::state::{LayerSource, MapLayer};

/// One of the fixed export strategies, fully resolved to URLs and names.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadPlan {
    /// Hand the source URL to the platform directly (GeoTIFF file links)
    DirectFile { url: String, file_name: String },
    /// Fetch the source document and save it (GeoJSON)
    FetchBlob { url: String, file_name: String },
    /// WFS GetFeature shape-zip export (WMS feature layers)
    WfsShapeZip { url: String, file_name: String },
    /// WCS GetCoverage export (coverage-backed rasters)
    WcsCoverage { url: String, file_name: String },
    /// Clipped WMS GetMap snapshot of the current extent (WMS tile layers);
    /// dimensions are resolved against server limits at execution time
    WmsSnapshot {
        base_url: String,
        layer_name: String,
        bbox: BBox,
        resolution: f64,
        file_name: String,
    },
    /// No export available; the message is surfaced to the user
    Unsupported { message: String },
}

/// Outcome of a download, delivered through the channel.
#[derive(Debug, Clone)]
pub enum DownloadResult {
    /// Bytes were written to the chosen destination
    Saved { file_name: String, bytes: usize },
    /// The browser took over a direct link
    #[allow(dead_code)] // Constructed on WASM only
    Started { file_name: String },
    /// The user cancelled the save dialog
    Cancelled,
    /// The layer type cannot be exported
    Rejected(String),
    /// Network or filesystem failure
    Error(String),
}

/// Selects the export strategy for a layer given the current view.
pub fn plan(layer: &MapLayer, view: &MapView) -> DownloadPlan {
    match &layer.source {
        LayerSource::GeoTiff { url, coverage_id } => {
            let file_name = export_file_name(&layer.title, "tif");
            match coverage_id {
                Some(coverage) => DownloadPlan::WcsCoverage {
                    url: wcs::get_coverage_url(url, coverage),
                    file_name,
                },
                None => DownloadPlan::DirectFile {
                    url: url.clone(),
                    file_name,
                },
            }
        }
        LayerSource::GeoJson { url } => DownloadPlan::FetchBlob {
            url: url.clone(),
            file_name: export_file_name(&layer.title, "geojson"),
        },
        LayerSource::WmsFeatures {
            base_url,
            feature_type,
            ..
        } => DownloadPlan::WfsShapeZip {
            url: wfs::get_feature_url(base_url, feature_type),
            file_name: export_file_name(&layer.title, "zip"),
        },
        LayerSource::WmsTiles {
            base_url,
            layer_name,
        } => DownloadPlan::WmsSnapshot {
            base_url: base_url.clone(),
            layer_name: layer_name.clone(),
            bbox: view.visible_bbox(),
            resolution: view.resolution(),
            file_name: export_file_name(&layer.title, "tiff"),
        },
        LayerSource::Osm => DownloadPlan::Unsupported {
            message: "OpenStreetMap data cannot be exported here due to licensing restrictions."
                .to_string(),
        },
    }
}

/// Derives a filesystem-friendly file name from a layer title.
fn export_file_name(title: &str, extension: &str) -> String {
    let stem: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        format!("layer.{}", extension)
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// Channel-based downloader for async layer exports.
///
/// Downloads are async but egui's update() is synchronous. This struct
/// provides a channel to pass results from the download task back to the
/// UI thread.
pub struct DownloadChannel {
    sender: Sender<DownloadResult>,
    receiver: Receiver<DownloadResult>,
}

impl Default for DownloadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Executes a download plan off-thread.
    ///
    /// Unsupported plans short-circuit to a rejection without spawning
    /// anything (and without any network traffic).
    pub fn start(&self, ctx: egui::Context, plan: DownloadPlan, capabilities: CapabilitiesCache) {
        if let DownloadPlan::Unsupported { message } = plan {
            let _ = self.sender.send(DownloadResult::Rejected(message));
            ctx.request_repaint();
            return;
        }

        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = run_plan(plan, capabilities);
            let _ = sender.send(result);
            ctx.request_repaint();
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = run_plan(plan, capabilities).await;
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed download.
    pub fn try_recv(&self) -> Option<DownloadResult> {
        self.receiver.try_recv().ok()
    }
}

/// Resolves a WMS snapshot's output size against the server's advertised
/// limits, fetching capabilities once per server.
fn resolve_snapshot_size(
    limits: Option<ServerLimits>,
    bbox: &BBox,
    resolution: f64,
) -> (u32, u32) {
    let limits = limits.unwrap_or_default();
    let (width, height) = wms::pixel_dimensions(bbox, resolution);
    wms::clamp_dimensions(width, height, &limits)
}

#[cfg(not(target_arch = "wasm32"))]
fn server_limits(base_url: &str, cache: &CapabilitiesCache) -> Option<ServerLimits> {
    if let Some(limits) = cache.get(base_url) {
        return Some(limits);
    }
    let url = capabilities::capabilities_url(base_url);
    match crate::net::fetch_text(&url).map_err(|e| e.to_string()).and_then(|xml| {
        capabilities::parse_capabilities(&xml).map_err(|e| e.to_string())
    }) {
        Ok(limits) => {
            cache.insert(base_url, limits);
            Some(limits)
        }
        Err(e) => {
            log::warn!("GetCapabilities failed for {}: {}", base_url, e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn server_limits(base_url: &str, cache: &CapabilitiesCache) -> Option<ServerLimits> {
    if let Some(limits) = cache.get(base_url) {
        return Some(limits);
    }
    let url = capabilities::capabilities_url(base_url);
    let xml = match crate::net::fetch_text(&url).await {
        Ok(xml) => xml,
        Err(e) => {
            log::warn!("GetCapabilities failed for {}: {}", base_url, e);
            return None;
        }
    };
    match capabilities::parse_capabilities(&xml) {
        Ok(limits) => {
            cache.insert(base_url, limits);
            Some(limits)
        }
        Err(e) => {
            log::warn!("GetCapabilities parse failed for {}: {}", base_url, e);
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_plan(plan: DownloadPlan, capabilities: CapabilitiesCache) -> DownloadResult {
    match plan {
        DownloadPlan::DirectFile { url, file_name }
        | DownloadPlan::FetchBlob { url, file_name }
        | DownloadPlan::WfsShapeZip { url, file_name }
        | DownloadPlan::WcsCoverage { url, file_name } => fetch_and_save(&url, &file_name),
        DownloadPlan::WmsSnapshot {
            base_url,
            layer_name,
            bbox,
            resolution,
            file_name,
        } => {
            let limits = server_limits(&base_url, &capabilities);
            let (width, height) = resolve_snapshot_size(limits, &bbox, resolution);
            let url = wms::get_map_url(&base_url, &layer_name, &bbox, width, height);
            fetch_and_save(&url, &file_name)
        }
        DownloadPlan::Unsupported { message } => DownloadResult::Rejected(message),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_and_save(url: &str, file_name: &str) -> DownloadResult {
    let bytes = match crate::net::fetch_bytes(url) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Download of {} failed: {}", url, e);
            return DownloadResult::Error(format!("Download failed: {}", e));
        }
    };
    match save::save_bytes(file_name, &bytes) {
        Ok(true) => DownloadResult::Saved {
            file_name: file_name.to_string(),
            bytes: bytes.len(),
        },
        Ok(false) => DownloadResult::Cancelled,
        Err(e) => {
            log::error!("Saving {} failed: {}", file_name, e);
            DownloadResult::Error(e)
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn run_plan(plan: DownloadPlan, capabilities: CapabilitiesCache) -> DownloadResult {
    match plan {
        // In the browser, direct file links go straight to the platform.
        DownloadPlan::DirectFile { url, file_name } => match save::open_url(&url) {
            Ok(()) => DownloadResult::Started { file_name },
            Err(e) => {
                log::error!("Opening {} failed: {}", url, e);
                DownloadResult::Error(e)
            }
        },
        DownloadPlan::FetchBlob { url, file_name }
        | DownloadPlan::WfsShapeZip { url, file_name }
        | DownloadPlan::WcsCoverage { url, file_name } => fetch_and_save(&url, &file_name).await,
        DownloadPlan::WmsSnapshot {
            base_url,
            layer_name,
            bbox,
            resolution,
            file_name,
        } => {
            let limits = server_limits(&base_url, &capabilities).await;
            let (width, height) = resolve_snapshot_size(limits, &bbox, resolution);
            let url = wms::get_map_url(&base_url, &layer_name, &bbox, width, height);
            fetch_and_save(&url, &file_name).await
        }
        DownloadPlan::Unsupported { message } => DownloadResult::Rejected(message),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_and_save(url: &str, file_name: &str) -> DownloadResult {
    let bytes = match crate::net::fetch_bytes(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Download of {} failed: {}", url, e);
            return DownloadResult::Error(format!("Download failed: {}", e));
        }
    };
    match save::save_bytes(file_name, &bytes) {
        Ok(true) => DownloadResult::Saved {
            file_name: file_name.to_string(),
            bytes: bytes.len(),
        },
        Ok(false) => DownloadResult::Cancelled,
        Err(e) => {
            log::error!("Saving {} failed: {}", file_name, e);
            DownloadResult::Error(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MapLayer;

    fn view() -> MapView {
        MapView::default()
    }

    #[test]
    fn test_osm_layer_rejected_without_network() {
        let layer = MapLayer::new("OpenStreetMap", LayerSource::Osm);
        match plan(&layer, &view()) {
            DownloadPlan::Unsupported { message } => {
                assert!(message.contains("licensing"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_geotiff_direct_link() {
        let layer = MapLayer::new(
            "Elevation Model",
            LayerSource::GeoTiff {
                url: "https://data.example.org/dem.tif".into(),
                coverage_id: None,
            },
        );
        match plan(&layer, &view()) {
            DownloadPlan::DirectFile { url, file_name } => {
                assert_eq!(url, "https://data.example.org/dem.tif");
                assert_eq!(file_name, "elevation_model.tif");
            }
            other => panic!("expected direct file, got {:?}", other),
        }
    }

    #[test]
    fn test_coverage_backed_geotiff_uses_wcs() {
        let layer = MapLayer::new(
            "Air Temperature",
            LayerSource::GeoTiff {
                url: "https://example.org/ows".into(),
                coverage_id: Some("demo__temperature".into()),
            },
        );
        match plan(&layer, &view()) {
            DownloadPlan::WcsCoverage { url, .. } => {
                assert!(url.contains("request=GetCoverage"));
                assert!(url.contains("coverageId=demo__temperature"));
            }
            other => panic!("expected WCS coverage, got {:?}", other),
        }
    }

    #[test]
    fn test_wms_features_exports_shape_zip() {
        let layer = MapLayer::new(
            "Monitoring Stations",
            LayerSource::WmsFeatures {
                base_url: "https://example.org/ows".into(),
                layer_name: "demo:stations".into(),
                feature_type: "demo:stations".into(),
            },
        );
        match plan(&layer, &view()) {
            DownloadPlan::WfsShapeZip { url, file_name } => {
                assert!(url.contains("outputFormat=SHAPE-ZIP"));
                assert_eq!(file_name, "monitoring_stations.zip");
            }
            other => panic!("expected shape-zip, got {:?}", other),
        }
    }

    #[test]
    fn test_wms_tiles_snapshot_uses_current_view() {
        let layer = MapLayer::new(
            "Land Use",
            LayerSource::WmsTiles {
                base_url: "https://example.org/ows".into(),
                layer_name: "demo:landuse".into(),
            },
        );
        let view = view();
        match plan(&layer, &view) {
            DownloadPlan::WmsSnapshot {
                bbox, resolution, ..
            } => {
                assert_eq!(bbox, view.visible_bbox());
                assert_eq!(resolution, view.resolution());
            }
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_size_clamped_by_limits() {
        let bbox = BBox::new(0.0, 0.0, 10_000.0, 5_000.0);
        let limits = ServerLimits {
            max_width: 500,
            max_height: 500,
        };
        // At 1 m/px this extent wants 10000x5000.
        let (w, h) = resolve_snapshot_size(Some(limits), &bbox, 1.0);
        assert!(w <= 500 && h <= 500);
        assert_eq!((w, h), (500, 250));
    }

    #[test]
    fn test_snapshot_size_defaults_without_capabilities() {
        let bbox = BBox::new(0.0, 0.0, 10_000.0, 5_000.0);
        let (w, h) = resolve_snapshot_size(None, &bbox, 1.0);
        assert_eq!(
            (w, h),
            (
                capabilities::DEFAULT_MAX_DIMENSION,
                capabilities::DEFAULT_MAX_DIMENSION / 2
            )
        );
    }

    #[test]
    fn test_export_file_name_sanitized() {
        assert_eq!(export_file_name("City Districts", "geojson"), "city_districts.geojson");
        assert_eq!(export_file_name("!!!", "zip"), "layer.zip");
    }
}
