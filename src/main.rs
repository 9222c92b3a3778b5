#![warn(clippy::all)]

//! MapLab Workbench - a web-based map layer visualization workbench.
//!
//! This application renders an interactive layer stack (rasters, vectors,
//! OGC services) with a table of contents, legends, layer swipe comparison,
//! exports, and click-to-inspect feature info.

mod config;
mod download;
mod geo;
mod info;
mod legend;
mod loader;
mod net;
mod ogc;
mod raster;
mod state;
mod ui;
mod vector;

use eframe::egui;

use download::{DownloadChannel, DownloadResult};
use info::FeatureInfoChannel;
use loader::{LayerLoadChannel, LoadJob, ManifestChannel};
use ogc::CapabilitiesCache;
use raster::RasterTextureCache;
use state::{AppState, LayerId, LayerSource, VisibleLayerTracker};
use ui::{InfoPopup, PanelAction};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "MapLab Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct WorkbenchApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Tracker recomputing the visible-layer list on registry changes
    tracker: VisibleLayerTracker,

    /// Cache of colorized raster textures
    textures: RasterTextureCache,

    /// Per-server WMS capabilities cache, shared with download tasks
    capabilities: CapabilitiesCache,

    /// Channel for async layer payload loads
    layer_loader: LayerLoadChannel,

    /// Channel for the forecast manifest fetch
    manifest_loader: ManifestChannel,

    /// Channel for async layer exports
    downloads: DownloadChannel,

    /// Channel for feature/pixel info queries
    feature_info: FeatureInfoChannel,

    /// Monotonic click counter; stale feature-info batches are dropped
    click_seq: u64,

    /// Feature info popup for the latest click, if any
    info_popup: Option<InfoPopup>,
}

impl WorkbenchApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let mut app = Self {
            state: AppState::new(),
            tracker: VisibleLayerTracker::new(),
            textures: RasterTextureCache::new(),
            capabilities: CapabilitiesCache::new(),
            layer_loader: LayerLoadChannel::new(),
            manifest_loader: ManifestChannel::new(),
            downloads: DownloadChannel::new(),
            feature_info: FeatureInfoChannel::new(),
            click_seq: 0,
            info_popup: None,
        };
        app.request_initial_loads(&cc.egui_ctx);
        app
    }

    /// Kicks off the manifest fetch and payload loads for every layer that
    /// carries remote data.
    fn request_initial_loads(&mut self, ctx: &egui::Context) {
        log::info!("{} layers configured", self.state.registry.len());

        self.state.forecast.loading = true;
        self.manifest_loader
            .load(ctx.clone(), config::FORECAST_MANIFEST_URL.to_string());

        let jobs: Vec<(LayerId, LoadJob)> = self
            .state
            .registry
            .layers()
            .filter_map(|layer| match &layer.source {
                LayerSource::GeoJson { url } => {
                    Some((layer.id, LoadJob::Vector { url: url.clone() }))
                }
                LayerSource::GeoTiff { url, coverage_id } => {
                    let url = match coverage_id {
                        Some(coverage) => ogc::wcs::get_coverage_url(url, coverage),
                        None => url.clone(),
                    };
                    Some((layer.id, LoadJob::Raster { url }))
                }
                _ => None,
            })
            .collect();

        for (id, job) in jobs {
            self.start_layer_load(ctx, id, job);
        }
    }

    fn start_layer_load(&mut self, ctx: &egui::Context, id: LayerId, job: LoadJob) {
        if let Some(layer) = self.state.registry.get_mut(id) {
            layer.loading = true;
        }
        self.layer_loader.load(ctx.clone(), id, job);
    }

    /// Drains every channel, applying completed async work to the state.
    fn drain_channels(&mut self) {
        while let Some(load) = self.layer_loader.try_recv() {
            let title = self
                .state
                .registry
                .get(load.layer_id)
                .map(|l| l.title.clone())
                .unwrap_or_default();

            match load.result {
                Ok(data) => {
                    if let Some(layer) = self.state.registry.get_mut(load.layer_id) {
                        layer.loading = false;
                        // A layer still on the placeholder range gets its
                        // legend scaled from the data.
                        if let state::LayerData::Raster(grid) = &data {
                            if layer.value_range == (0.0, 1.0) {
                                if let Some((lo, hi)) = grid.value_range() {
                                    layer.value_range = (lo as f64, hi as f64);
                                }
                            }
                        }
                        layer.data = data;
                    }
                    self.textures.invalidate(load.layer_id);
                    self.state.status.set_message(format!("Loaded {}", title));
                }
                Err(e) => {
                    if let Some(layer) = self.state.registry.get_mut(load.layer_id) {
                        layer.loading = false;
                    }
                    log::error!("Loading {:?} failed: {}", title, e);
                    self.state.status.push_alert(
                        "Layer load failed",
                        format!("{} could not be loaded.", title),
                    );
                }
            }
        }

        while let Some(result) = self.manifest_loader.try_recv() {
            self.state.forecast.loading = false;
            match result {
                Ok(manifest) if manifest.is_empty() => {
                    log::warn!("Forecast manifest contains no timestamps");
                    self.state.status.set_message("Forecast manifest is empty");
                    self.state.forecast.manifest = Some(manifest);
                }
                Ok(manifest) => {
                    self.state.status.set_message(format!(
                        "{} forecast timestamps available",
                        manifest.entries.len()
                    ));
                    self.state.forecast.manifest = Some(manifest);
                }
                Err(e) => {
                    log::error!("Forecast manifest fetch failed: {}", e);
                    self.state.status.push_alert(
                        "Forecast unavailable",
                        "The forecast timestamp list could not be loaded.",
                    );
                }
            }
        }

        while let Some(result) = self.downloads.try_recv() {
            match result {
                DownloadResult::Saved { file_name, bytes } => {
                    self.state
                        .status
                        .set_message(format!("Saved {} ({} bytes)", file_name, bytes));
                }
                DownloadResult::Started { file_name } => {
                    self.state
                        .status
                        .set_message(format!("Download of {} started", file_name));
                }
                DownloadResult::Cancelled => {
                    self.state.status.set_message("Download cancelled");
                }
                DownloadResult::Rejected(message) => {
                    self.state.status.push_alert("Export unavailable", message);
                }
                DownloadResult::Error(e) => {
                    log::error!("Download failed: {}", e);
                    self.state
                        .status
                        .push_alert("Download failed", "The export could not be completed.");
                }
            }
        }

        while let Some(batch) = self.feature_info.try_recv() {
            if batch.seq != self.click_seq {
                log::debug!("Dropping stale feature info batch #{}", batch.seq);
                continue;
            }
            if let Some(popup) = &mut self.info_popup {
                popup.results = batch.results;
                popup.pending = false;
            }
        }
    }

    fn apply_actions(&mut self, ctx: &egui::Context, actions: Vec<PanelAction>) {
        for action in actions {
            match action {
                PanelAction::ToggleVisible(id) => self.state.registry.toggle_visible(id),
                PanelAction::SetOpacity(id, opacity) => {
                    self.state.registry.set_opacity(id, opacity)
                }
                PanelAction::SetRamp(id, ramp) => self.state.registry.set_ramp(id, ramp),
                PanelAction::Download(id) => {
                    let planned = self.state.registry.get(id).map(|layer| {
                        (
                            download::plan(layer, &self.state.viz.view),
                            layer.title.clone(),
                        )
                    });
                    if let Some((plan, title)) = planned {
                        self.state
                            .status
                            .set_message(format!("Exporting {}...", title));
                        self.downloads
                            .start(ctx.clone(), plan, self.capabilities.clone());
                    }
                }
                PanelAction::SelectForecast(index) => {
                    let entry = self.state.forecast.select(index).cloned();
                    if let Some(entry) = entry {
                        let layer_id = self.state.forecast_layer;
                        self.state
                            .status
                            .set_message(format!("Loading forecast step {}", entry.label));
                        self.start_layer_load(ctx, layer_id, LoadJob::Raster { url: entry.url });
                    }
                }
                PanelAction::ReloadManifest => {
                    self.state.forecast.loading = true;
                    self.manifest_loader
                        .load(ctx.clone(), config::FORECAST_MANIFEST_URL.to_string());
                }
            }
        }
    }

    /// Fires the feature/pixel info fan-out for a canvas click.
    fn handle_click(&mut self, ctx: &egui::Context, pos: egui::Pos2) {
        self.click_seq += 1;
        let tasks = info::build_tasks(
            &self.state.registry,
            self.tracker.visible(),
            &self.state.viz.view,
            pos,
        );

        let mut popup = InfoPopup::pending_at(pos + egui::Vec2::new(12.0, 12.0));
        if tasks.is_empty() {
            popup.pending = false;
        } else {
            self.feature_info.query(ctx.clone(), self.click_seq, tasks);
        }
        self.info_popup = Some(popup);
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_channels();

        self.state.swipe.sync(&mut self.state.registry);
        self.tracker.update(&self.state.registry);

        ui::render_top_bar(ctx, &self.state);
        let mut actions = ui::render_left_panel(ctx, &self.state.registry);
        ui::render_right_panel(
            ctx,
            &self.state.registry,
            &self.tracker,
            &mut self.state.swipe,
        );
        actions.extend(ui::render_bottom_panel(ctx, &self.state.forecast));

        let clicked = ui::render_canvas(ctx, &mut self.state, &self.tracker, &mut self.textures);

        if let Some(popup) = &mut self.info_popup {
            ui::render_info_popup(ctx, popup);
            if !popup.open {
                self.info_popup = None;
            }
        }
        ui::render_alerts(ctx, &mut self.state.status);

        self.apply_actions(ctx, actions);
        if let Some(pos) = clicked {
            self.handle_click(ctx, pos);
        }
    }
}
