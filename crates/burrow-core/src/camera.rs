use crate::config::ViewportConfig;
use crate::geom::Point;
use serde::{Deserialize, Serialize};

/// Zoom and pan of the tree view. Pan limits are derived by the viewport controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
        }
    }
}

impl Camera {
    /// Sets the zoom, clamped to the configured range. Returns `true` if it changed.
    pub fn set_zoom(&mut self, zoom: f64, cfg: &ViewportConfig) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let clamped = clamp_zoom(zoom, cfg);
        if clamped == self.zoom {
            return false;
        }
        self.zoom = clamped;
        true
    }

    /// Camera at zoom 1 (or the nearest allowed zoom) with no pan.
    pub fn within(cfg: &ViewportConfig) -> Self {
        Self {
            zoom: clamp_zoom(1.0, cfg),
            pan: Point::default(),
        }
    }

    /// Applies `notches` wheel steps (positive zooms in).
    pub fn zoom_by(&mut self, notches: f64, cfg: &ViewportConfig) -> bool {
        self.set_zoom(self.zoom + notches * cfg.zoom_step, cfg)
    }
}

/// Like `f64::clamp`, but never panics on an inverted or NaN range: the upper bound wins.
fn clamp_zoom(zoom: f64, cfg: &ViewportConfig) -> f64 {
    zoom.max(cfg.min_zoom).min(cfg.max_zoom)
}
