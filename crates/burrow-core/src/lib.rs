#![forbid(unsafe_code)]

//! Graph model and shared types for the burrow explorer (headless).
//!
//! Design goals:
//! - every structural change goes through one reducer ([`GraphModel::apply`])
//! - layout positions are derived data; shared state carries topology only
//! - collaborators (content retrieval, link parsing, topic extraction) sit behind traits

pub mod camera;
pub mod config;
pub mod error;
pub mod geom;
pub mod model;
pub mod services;
pub mod share;

pub use camera::Camera;
pub use config::{DeviceClass, DeviceProfile, ForceConfig, LayoutConfig, ViewportConfig};
pub use error::{Error, Result};
pub use geom::{Axis, Bounds, Point, Size};
pub use model::{
    GraphAction, GraphModel, NewNode, Node, NodeId, PageRef, Redirect, Transition, article_url,
};
pub use services::{ContentSource, LinkParser, PageData, RelatedLink, SearchHit, TopicExtractor};
pub use share::{ImportReport, SharedNode, SharedTopology};

#[cfg(test)]
mod tests;
