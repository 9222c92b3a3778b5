//! UI panels and shared UI types.

mod bottom_panel;
mod canvas;
pub mod colors;
mod left_panel;
mod popup;
mod right_panel;
mod top_bar;

pub use bottom_panel::render_bottom_panel;
pub use canvas::render_canvas;
pub use left_panel::render_left_panel;
pub use popup::{render_alerts, render_info_popup, InfoPopup};
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;

use crate::state::LayerId;

/// Deferred UI actions collected while panels render.
///
/// Panels borrow the registry immutably while drawing; mutations and
/// channel spawns are applied by the app afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    ToggleVisible(LayerId),
    SetOpacity(LayerId, f32),
    SetRamp(LayerId, crate::legend::ColorRamp),
    Download(LayerId),
    SelectForecast(usize),
    ReloadManifest,
}
