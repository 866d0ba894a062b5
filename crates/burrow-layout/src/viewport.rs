//! Pan limits from graph extent, zoom and viewport size.
//!
//! A pan value `p` maps graph coordinate `g` to screen coordinate `g * zoom + p`. Desktop limits
//! keep the padded graph either centred (when it fits) or between its two edge alignments. Mobile
//! limits pin the root near the top-left and only allow excursions that reveal content to the
//! right or below.

use burrow_core::{Axis, Bounds, Camera, DeviceClass, GraphModel, Point, Size, ViewportConfig};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanLimits {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PanLimits {
    fn set_axis(&mut self, axis: Axis, min: f64, max: f64) {
        match axis {
            Axis::X => (self.min_x, self.max_x) = (min, max),
            Axis::Y => (self.min_y, self.max_y) = (min, max),
        }
    }

    pub fn min_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min_x,
            Axis::Y => self.min_y,
        }
    }

    pub fn max_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max_x,
            Axis::Y => self.max_y,
        }
    }

    pub fn is_locked(&self, axis: Axis) -> bool {
        self.min_along(axis) == self.max_along(axis)
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(self.min_x, self.max_x), p.y.clamp(self.min_y, self.max_y))
    }
}

/// Everything the limit computation reads, captured at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportInput {
    /// Padded graph bounds; `None` for an empty graph.
    pub bounds: Option<Bounds>,
    pub root: Option<Point>,
    pub zoom: f64,
    pub viewport: Size,
    pub device: DeviceClass,
}

pub fn compute_pan_limits(input: &ViewportInput, cfg: &ViewportConfig) -> PanLimits {
    let mut limits = PanLimits::default();
    let Some(bounds) = input.bounds else {
        return limits;
    };
    let zoom = input.zoom;
    for axis in [Axis::X, Axis::Y] {
        let viewport = input.viewport.along(axis);
        let lo = bounds.min_along(axis);
        let hi = bounds.max_along(axis);
        let scaled = (hi - lo) * zoom;
        let (min, max) = match input.device {
            DeviceClass::Desktop => {
                if scaled <= viewport {
                    let centred = (viewport - scaled) / 2.0 - lo * zoom;
                    (centred, centred)
                } else {
                    (viewport - hi * zoom - cfg.pan_margin, cfg.pan_margin - lo * zoom)
                }
            }
            DeviceClass::Mobile => {
                let pinned = input.root.map_or(lo + cfg.bounds_padding, |r| r.along(axis));
                let anchor = cfg.root_margin - pinned * zoom;
                if scaled <= viewport {
                    (anchor, anchor)
                } else {
                    let far = viewport - hi * zoom - cfg.pan_margin;
                    (far.min(anchor), anchor)
                }
            }
        };
        limits.set_axis(axis, min, max);
    }
    limits
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    Moved(Point),
    Unchanged,
}

/// Camera state plus the limits it is clamped against.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportController {
    camera: Camera,
    viewport: Size,
    device: DeviceClass,
    cfg: ViewportConfig,
    limits: PanLimits,
}

impl ViewportController {
    pub fn new(viewport: Size, device: DeviceClass, cfg: ViewportConfig) -> Self {
        Self {
            camera: Camera::within(&cfg),
            viewport,
            device,
            cfg,
            limits: PanLimits::default(),
        }
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn limits(&self) -> PanLimits {
        self.limits
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.cfg
    }

    pub fn input(&self, model: &GraphModel) -> ViewportInput {
        ViewportInput {
            bounds: model.bounds(self.cfg.bounds_padding),
            root: model.root().and_then(|r| model.position(r)),
            zoom: self.camera.zoom,
            viewport: self.viewport,
            device: self.device,
        }
    }

    /// Recomputes limits from the current model and re-clamps the pan into them.
    pub fn recompute(&mut self, model: &GraphModel) -> PanLimits {
        self.limits = compute_pan_limits(&self.input(model), &self.cfg);
        self.camera.pan = self.limits.clamp(self.camera.pan);
        self.limits
    }

    /// Clamps `target` into the limits; a request whose clamped value equals the current pan
    /// is a no-op.
    pub fn request_pan(&mut self, target: Point) -> PanOutcome {
        if !target.is_finite() {
            return PanOutcome::Unchanged;
        }
        let clamped = self.limits.clamp(target);
        if clamped == self.camera.pan {
            return PanOutcome::Unchanged;
        }
        self.camera.pan = clamped;
        PanOutcome::Moved(clamped)
    }

    pub fn pan_by(&mut self, delta: Point) -> PanOutcome {
        let pan = self.camera.pan;
        self.request_pan(Point::new(pan.x + delta.x, pan.y + delta.y))
    }

    pub fn set_zoom(&mut self, zoom: f64, model: &GraphModel) -> bool {
        let changed = self.camera.set_zoom(zoom, &self.cfg);
        if changed {
            self.recompute(model);
        }
        changed
    }

    pub fn zoom_by(&mut self, notches: f64, model: &GraphModel) -> bool {
        let changed = self.camera.zoom_by(notches, &self.cfg);
        if changed {
            self.recompute(model);
        }
        changed
    }

    pub fn resize(&mut self, viewport: Size, model: &GraphModel) -> PanLimits {
        self.viewport = viewport;
        self.recompute(model)
    }

    pub fn set_device(&mut self, device: DeviceClass, model: &GraphModel) -> PanLimits {
        self.device = device;
        self.recompute(model)
    }

    /// Back to zoom 1 (clamped into the configured range) and the pan the current limits allow
    /// nearest the origin.
    pub fn reset(&mut self, model: &GraphModel) -> PanLimits {
        self.camera = Camera::within(&self.cfg);
        self.recompute(model)
    }

    /// Pans so `target` sits at the viewport centre, as far as the limits allow.
    pub fn center_on(&mut self, target: Point) -> PanOutcome {
        let zoom = self.camera.zoom;
        self.request_pan(Point::new(
            self.viewport.width / 2.0 - target.x * zoom,
            self.viewport.height / 2.0 - target.y * zoom,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bounds: Bounds, device: DeviceClass, viewport: Size) -> ViewportInput {
        ViewportInput {
            bounds: Some(bounds),
            root: None,
            zoom: 1.0,
            viewport,
            device,
        }
    }

    #[test]
    fn desktop_small_graph_is_centred_and_locked() {
        let cfg = ViewportConfig::default();
        let b = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 200.0,
            max_y: 100.0,
        };
        let limits = compute_pan_limits(
            &input(b, DeviceClass::Desktop, Size::new(1000.0, 500.0)),
            &cfg,
        );
        assert_eq!(limits.min_x, 400.0);
        assert!(limits.is_locked(Axis::X));
        assert_eq!(limits.min_y, 200.0);
    }

    #[test]
    fn desktop_large_graph_ranges_between_edge_alignments() {
        let cfg = ViewportConfig::default();
        let b = Bounds {
            min_x: -100.0,
            min_y: 0.0,
            max_x: 1900.0,
            max_y: 100.0,
        };
        let limits = compute_pan_limits(
            &input(b, DeviceClass::Desktop, Size::new(1000.0, 500.0)),
            &cfg,
        );
        assert_eq!(limits.min_x, 1000.0 - 1900.0 - 50.0);
        assert_eq!(limits.max_x, 150.0);
    }

    #[test]
    fn empty_graph_locks_at_zero() {
        let cfg = ViewportConfig::default();
        let limits = compute_pan_limits(
            &ViewportInput {
                bounds: None,
                root: None,
                zoom: 1.0,
                viewport: Size::new(800.0, 600.0),
                device: DeviceClass::Mobile,
            },
            &cfg,
        );
        assert_eq!(limits, PanLimits::default());
    }
}
