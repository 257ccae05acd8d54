#![forbid(unsafe_code)]

//! `orderable-web` drives drag-based sibling reordering from host events.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes drag lifecycle
//!   events and answers geometry queries through [`Platform`].
//! - **One session per container**: snapshot once at drag start, re-rank on
//!   every movement, move the dragged element once at drag end.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate intentionally does not bind to `wasm-bindgen` yet. A DOM host
//! implements [`Platform`] over its element handles and forwards events to
//! [`Orderable::dispatch`]; [`MemoryPlatform`] covers headless use.

pub mod listeners;
pub mod marker;
pub mod memory;
pub mod orderable;
pub mod platform;
pub mod session;

#[cfg(feature = "input-parser")]
pub mod input_parser;

pub use listeners::ListenerRegistry;
pub use marker::{MarkerController, MarkerPlacement};
pub use memory::{MemoryPlatform, NodeId};
pub use orderable::{
    DEFAULT_CLASS_NAME, Orderable, OrderableConfig, OrderableDispatch, OrderableError,
    OrderableHostCommand, OrderableIgnoredReason, OrderableLifecyclePhase, OrderableLogEntry,
    OrderableLogOutcome,
};
pub use platform::{DragEvent, DragEventKind, ListenOptions, Platform};
pub use session::{
    DragCancelReason, DragReorderEffect, DragReorderMachine, DragReorderMachineError,
    DragReorderNoopReason, DragReorderState, DragReorderTransition, Placement,
};

pub use orderable_core::{Direction, Intent, Point, Rect};
