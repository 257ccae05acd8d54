#![forbid(unsafe_code)]

//! Host platform contract.
//!
//! Everything that touches a real visual tree goes through [`Platform`]. The
//! engine never reads geometry or mutates nodes on its own, so a DOM binding,
//! a native toolkit, and [`crate::memory::MemoryPlatform`] are interchangeable.

use core::fmt::Debug;
use core::hash::Hash;

use orderable_core::{Intent, Point, Rect};

/// Drag lifecycle event kinds the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    /// A drag began on a container child.
    DragStart,
    /// The pointer moved over the container while dragging.
    DragOver,
    /// The platform is about to perform its default drop.
    Drop,
    /// The drag finished (released or otherwise ended by the platform).
    DragEnd,
}

impl DragEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::DragOver => "dragover",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dragstart" => Some(Self::DragStart),
            "dragover" => Some(Self::DragOver),
            "drop" => Some(Self::Drop),
            "dragend" => Some(Self::DragEnd),
            _ => None,
        }
    }
}

/// Subscription options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenOptions {
    /// Detach automatically after the first delivery.
    pub once: bool,
}

impl ListenOptions {
    pub const PERSISTENT: Self = Self { once: false };
    pub const ONCE: Self = Self { once: true };
}

/// One host event, addressed to the element the listener was attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent<H> {
    pub kind: DragEventKind,
    pub target: H,
    /// Pointer position in viewport coordinates.
    pub client: Point,
}

impl<H> DragEvent<H> {
    #[inline]
    pub const fn new(kind: DragEventKind, target: H, client: Point) -> Self {
        Self {
            kind,
            target,
            client,
        }
    }
}

/// Visual-tree and event-subscription operations supplied by the host.
pub trait Platform {
    /// Opaque element handle.
    type Handle: Copy + Eq + Hash + Debug;

    /// Resolve the container carrying `class_name`, if any.
    fn resolve_container(&self, class_name: &str) -> Option<Self::Handle>;

    /// Current children of `container`, in order.
    fn query_children(&self, container: Self::Handle) -> Vec<Self::Handle>;

    /// Bounding box of `handle` in viewport coordinates.
    fn bounding_box(&self, handle: Self::Handle) -> Rect;

    /// Current scroll offset of the page.
    fn scroll_offset(&self) -> Point;

    /// Move `node` so it sits immediately before/after `reference`.
    ///
    /// Inserting a node relative to itself must be a no-op.
    fn insert_adjacent(&mut self, reference: Self::Handle, side: Intent, node: Self::Handle);

    /// Detach `node` from the tree. Detached nodes are ignored.
    ///
    /// A node made by [`Platform::create_node`] is gone for good afterwards;
    /// platforms may reclaim it.
    fn remove_node(&mut self, node: Self::Handle);

    /// Create a detached node of the same element kind as `like`, carrying
    /// `class_name`.
    fn create_node(&mut self, like: Self::Handle, class_name: &str) -> Self::Handle;

    /// Subscribe to `kind` events on `handle`.
    fn listen(&mut self, handle: Self::Handle, kind: DragEventKind, options: ListenOptions);

    /// Unsubscribe from `kind` events on `handle`.
    fn unlisten(&mut self, handle: Self::Handle, kind: DragEventKind);

    /// A one-shot listener on `handle` just fired.
    ///
    /// Platforms that detach `once` listeners themselves keep the default.
    fn once_listener_fired(&mut self, handle: Self::Handle, kind: DragEventKind) {
        let _ = (handle, kind);
    }
}
