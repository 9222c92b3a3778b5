//! Async layer payload and manifest loading.
//!
//! Fetches and decodes layer payloads (GeoTIFF rasters, GeoJSON vectors)
//! and the forecast manifest off-thread, bridging results back into the
//! update loop through channels.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use eframe::egui;

use crate::raster::decode_geotiff;
use crate::state::{ForecastManifest, LayerData, LayerId};
use crate::vector::VectorData;

/// What to fetch and how to decode it.
#[derive(Debug, Clone)]
pub enum LoadJob {
    /// GeoTIFF bytes from a direct URL or WCS GetCoverage request
    Raster { url: String },
    /// GeoJSON document
    Vector { url: String },
}

/// Completed (or failed) payload load for a layer.
pub struct LayerLoadResult {
    pub layer_id: LayerId,
    pub result: Result<LayerData, String>,
}

/// Channel-based loader for layer payloads.
pub struct LayerLoadChannel {
    sender: Sender<LayerLoadResult>,
    receiver: Receiver<LayerLoadResult>,
}

impl Default for LayerLoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerLoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns an async fetch-and-decode task for a layer.
    pub fn load(&self, ctx: egui::Context, layer_id: LayerId, job: LoadJob) {
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = run_job(&job);
            let _ = sender.send(LayerLoadResult { layer_id, result });
            ctx.request_repaint();
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = run_job(&job).await;
            let _ = sender.send(LayerLoadResult { layer_id, result });
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&self) -> Option<LayerLoadResult> {
        self.receiver.try_recv().ok()
    }
}

fn decode_job(job: &LoadJob, bytes: Vec<u8>) -> Result<LayerData, String> {
    match job {
        LoadJob::Raster { .. } => {
            let grid = decode_geotiff(&bytes).map_err(|e| e.to_string())?;
            log::info!(
                "Decoded raster {}x{} ({} bytes)",
                grid.width,
                grid.height,
                bytes.len()
            );
            Ok(LayerData::Raster(Arc::new(grid)))
        }
        LoadJob::Vector { .. } => {
            let text = String::from_utf8(bytes).map_err(|e| e.to_string())?;
            let data = VectorData::from_geojson(&text)?;
            log::info!("Parsed {} vector features", data.features.len());
            Ok(LayerData::Vector(Arc::new(data)))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_job(job: &LoadJob) -> Result<LayerData, String> {
    let url = match job {
        LoadJob::Raster { url } | LoadJob::Vector { url } => url,
    };
    let bytes = crate::net::fetch_bytes(url).map_err(|e| e.to_string())?;
    decode_job(job, bytes)
}

#[cfg(target_arch = "wasm32")]
async fn run_job(job: &LoadJob) -> Result<LayerData, String> {
    let url = match job {
        LoadJob::Raster { url } | LoadJob::Vector { url } => url,
    };
    let bytes = crate::net::fetch_bytes(url).await.map_err(|e| e.to_string())?;
    decode_job(job, bytes)
}

/// Channel-based loader for the forecast timestamp manifest.
pub struct ManifestChannel {
    sender: Sender<Result<ForecastManifest, String>>,
    receiver: Receiver<Result<ForecastManifest, String>>,
}

impl Default for ManifestChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Fetches and parses the manifest once.
    pub fn load(&self, ctx: egui::Context, url: String) {
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let result = crate::net::fetch_text(&url)
                .map_err(|e| e.to_string())
                .and_then(|json| ForecastManifest::parse(&json));
            let _ = sender.send(result);
            ctx.request_repaint();
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let result = match crate::net::fetch_text(&url).await {
                Ok(json) => ForecastManifest::parse(&json),
                Err(e) => Err(e.to_string()),
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for the fetched manifest.
    pub fn try_recv(&self) -> Option<Result<ForecastManifest, String>> {
        self.receiver.try_recv().ok()
    }
}
