#![forbid(unsafe_code)]

//! `burrow` is a headless graph explorer for encyclopedia browsing sessions.
//!
//! Every visited page becomes a node, laid out as a tree that grows as you read. The tree can be
//! compacted, splayed into a force-relaxed network, or explored sideways through a "rabbit hole"
//! of related links. Shared sessions carry topology only and are laid out again on import.
//!
//! The crates underneath can be used on their own:
//! - [`burrow_core`] (re-exported at the root): graph model, config, share format
//! - [`layout`]: placement, cascade collision, compact relayout, viewport limits
//! - [`force`]: force-directed relaxation

pub use burrow_core::*;
pub use burrow_force as force;
pub use burrow_layout as layout;

mod error;
pub mod explorer;
pub mod rabbit_hole;

pub use error::{Error, Result};
pub use explorer::{Explorer, ViewMode, VisitOutcome};
pub use rabbit_hole::{DigOutcome, RabbitHole, RabbitNode};
