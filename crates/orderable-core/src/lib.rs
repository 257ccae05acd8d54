#![forbid(unsafe_code)]

//! Core: geometry, axis prediction, intent resolution, and neighbor ranking.
//!
//! # Role in Orderable
//! `orderable-core` is the pure half of drag-based sibling reordering. It owns
//! the math that decides where a dragged element would land, and nothing
//! else: no visual tree, no events, no clocks.
//!
//! # Primary responsibilities
//! - **Geometry**: page-coordinate [`Point`]s, platform [`Rect`]s, centroids.
//! - **Direction**: the dominant layout axis of a sibling list.
//! - **Intent**: before/after resolution against the closest sibling.
//! - **Snapshot**: session-scoped sibling capture and stable ranking.
//!
//! # How it fits in the system
//! `orderable-web` drives a drag session from host events and calls into this
//! crate on every movement. Everything here is deterministic, so the same
//! snapshot and pointer always yield the same ranking and intent.

pub mod direction;
pub mod geometry;
pub mod intent;
pub mod logging;
pub mod snapshot;

pub use direction::{Direction, predict};
pub use geometry::{Point, Rect, centroid_of, distance};
pub use intent::{Intent, resolve};
pub use snapshot::{RankedSibling, SiblingRef, Snapshot, rank};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
