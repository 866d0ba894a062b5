use crate::geom::{Axis, Point, Size};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

/// Geometry constants for one device class.
///
/// Desktop trees grow downwards (primary axis `y`) and spread siblings horizontally; mobile trees
/// grow to the right (primary axis `x`) and spread siblings vertically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceProfile {
    pub primary_axis: Axis,
    /// Spacing between sibling centres on the spread axis.
    pub node_size: f64,
    /// Distance between a parent and its children on the primary axis.
    pub level_spacing: f64,
    /// Per-axis collision thresholds; two nodes collide iff both distances are below these.
    pub collision_threshold: Size,
    /// Distance a colliding node is pushed along the primary axis.
    pub push_amount: f64,
    /// Position of the first node of an empty graph.
    pub origin: Point,
    /// Lowest coordinate any node may have after a compact layout.
    pub min_padding: f64,
}

impl DeviceProfile {
    pub fn desktop() -> Self {
        Self {
            primary_axis: Axis::Y,
            node_size: 120.0,
            level_spacing: 140.0,
            collision_threshold: Size::new(80.0, 80.0),
            push_amount: 120.0,
            origin: Point::new(200.0, 50.0),
            min_padding: 50.0,
        }
    }

    pub fn mobile() -> Self {
        Self {
            primary_axis: Axis::X,
            node_size: 110.0,
            level_spacing: 160.0,
            collision_threshold: Size::new(100.0, 100.0),
            push_amount: 110.0,
            origin: Point::new(50.0, 200.0),
            min_padding: 50.0,
        }
    }

    pub fn spread_axis(&self) -> Axis {
        self.primary_axis.other()
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Padding added around node centres when computing graph bounds.
    pub bounds_padding: f64,
    /// Margin kept between the graph edge and the viewport edge when panning on desktop.
    pub pan_margin: f64,
    /// Distance the root stays from the top-left corner on mobile.
    pub root_margin: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change applied per wheel notch.
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            bounds_padding: 100.0,
            pan_margin: 50.0,
            root_margin: 50.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
            zoom_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceConfig {
    pub link_distance: f64,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    pub charge_distance_min: f64,
    pub collide_radius: f64,
    pub collide_strength: f64,
    pub center_strength: f64,
    /// Per-axis pull toward the centre.
    pub gravity: f64,
    pub velocity_decay: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub random_seed: u64,
}

impl ForceConfig {
    /// Ticks until alpha drops from 1 below `alpha_min` with the default decay.
    pub const DEFAULT_TICKS: f64 = 300.0;
    pub const DEFAULT_ALPHA_MIN: f64 = 0.001;

    pub fn default_alpha_decay() -> f64 {
        1.0 - Self::DEFAULT_ALPHA_MIN.powf(1.0 / Self::DEFAULT_TICKS)
    }

    /// Parameters used by rabbit-hole exploration panels.
    pub fn exploration() -> Self {
        Self {
            gravity: 0.0,
            ..Self::default()
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            link_distance: 120.0,
            charge_strength: -800.0,
            charge_distance_min: 1.0,
            collide_radius: 60.0,
            collide_strength: 1.0,
            center_strength: 1.0,
            gravity: 0.05,
            velocity_decay: 0.4,
            alpha_min: Self::DEFAULT_ALPHA_MIN,
            alpha_decay: Self::default_alpha_decay(),
            random_seed: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub desktop: DeviceProfile,
    pub mobile: DeviceProfile,
    pub viewport: ViewportConfig,
    pub network: ForceConfig,
    pub exploration: ForceConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self {
            desktop: DeviceProfile::desktop(),
            mobile: DeviceProfile::mobile(),
            viewport: ViewportConfig::default(),
            network: ForceConfig::default(),
            exploration: ForceConfig::exploration(),
        }
    }

    pub fn profile(&self, device: DeviceClass) -> &DeviceProfile {
        match device {
            DeviceClass::Desktop => &self.desktop,
            DeviceClass::Mobile => &self.mobile,
        }
    }

    /// Parses a (possibly partial) JSON document; absent keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        let mut cfg = Self::new();
        cfg.merge_json(&overrides)?;
        Ok(cfg)
    }

    /// Deep-merges `overrides` into this config.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                message: "layout config overrides must be a JSON object".to_string(),
            });
        }
        let mut base = serde_json::to_value(&*self)?;
        deep_merge_value(&mut base, overrides);
        let merged: Self = serde_json::from_value(base)?;
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    /// Rejects geometry and zoom values the layout engines cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, profile) in [("desktop", &self.desktop), ("mobile", &self.mobile)] {
            profile.validate(name)?;
        }
        let v = &self.viewport;
        require(
            v.min_zoom.is_finite() && v.min_zoom > 0.0,
            format_args!("viewport.minZoom must be finite and positive, got {}", v.min_zoom),
        )?;
        require(
            v.max_zoom.is_finite() && v.max_zoom >= v.min_zoom,
            format_args!(
                "viewport.maxZoom must be finite and at least minZoom ({}), got {}",
                v.min_zoom, v.max_zoom
            ),
        )?;
        for (key, value) in [
            ("zoomStep", v.zoom_step),
            ("boundsPadding", v.bounds_padding),
            ("panMargin", v.pan_margin),
            ("rootMargin", v.root_margin),
        ] {
            require(
                value.is_finite() && value >= 0.0,
                format_args!("viewport.{key} must be finite and non-negative, got {value}"),
            )?;
        }
        Ok(())
    }
}

impl DeviceProfile {
    fn validate(&self, name: &str) -> Result<()> {
        for (key, value) in [
            ("nodeSize", self.node_size),
            ("levelSpacing", self.level_spacing),
            ("pushAmount", self.push_amount),
            ("collisionThreshold.width", self.collision_threshold.width),
            ("collisionThreshold.height", self.collision_threshold.height),
        ] {
            require(
                value.is_finite() && value > 0.0,
                format_args!("{name}.{key} must be finite and positive, got {value}"),
            )?;
        }
        require(
            self.origin.is_finite() && self.min_padding.is_finite(),
            format_args!("{name}.origin and {name}.minPadding must be finite"),
        )
    }
}

fn require(ok: bool, message: std::fmt::Arguments<'_>) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            message: message.to_string(),
        })
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
