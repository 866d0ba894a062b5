#![forbid(unsafe_code)]

//! Tree-mode layout for the burrow explorer.
//!
//! One strategy, parameterised by the device profile's primary (growth) and spread axes:
//! - [`placer`]: candidate position for a newly inserted node
//! - [`collision`]: bounded cascade push after an insertion
//! - [`compact`]: full-graph batch relayout
//! - [`viewport`]: pan limits and clamping

pub mod collision;
pub mod compact;
pub mod placer;
pub mod viewport;

pub use collision::{Cascade, Displacement};
pub use compact::{CompactLayout, CompactReport};
pub use viewport::{PanLimits, PanOutcome, ViewportController, ViewportInput, compute_pan_limits};
