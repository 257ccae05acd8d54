#![forbid(unsafe_code)]

//! Insertion marker lifecycle.

use orderable_core::Intent;

use crate::platform::Platform;

/// Where the marker currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPlacement<H> {
    pub reference: H,
    pub side: Intent,
}

/// Owns the one transient marker node of a drag session.
///
/// The node is created detached, moved next to the closest sibling on every
/// placement, and removed for good by [`MarkerController::dispose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerController<H> {
    node: Option<H>,
    placement: Option<MarkerPlacement<H>>,
}

impl<H> Default for MarkerController<H> {
    fn default() -> Self {
        Self {
            node: None,
            placement: None,
        }
    }
}

impl<H: Copy + Eq> MarkerController<H> {
    /// Create the marker node, same element kind as `like`.
    pub fn create<P>(platform: &mut P, like: H, class_name: &str) -> Self
    where
        P: Platform<Handle = H>,
    {
        Self {
            node: Some(platform.create_node(like, class_name)),
            placement: None,
        }
    }

    /// Marker node, until disposed.
    #[must_use]
    pub fn node(&self) -> Option<H> {
        self.node
    }

    #[must_use]
    pub fn placement(&self) -> Option<MarkerPlacement<H>> {
        self.placement
    }

    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Move the marker next to `reference`.
    ///
    /// Returns `false` without touching the tree when the marker was disposed
    /// or `reference` is the marker itself.
    pub fn place<P>(&mut self, platform: &mut P, reference: H, side: Intent) -> bool
    where
        P: Platform<Handle = H>,
    {
        let Some(node) = self.node else {
            return false;
        };
        if node == reference {
            return false;
        }
        // `insert_adjacent` moves an already placed marker; removing it first
        // would let the platform reclaim the node.
        platform.insert_adjacent(reference, side, node);
        self.placement = Some(MarkerPlacement { reference, side });
        true
    }

    /// Remove the marker permanently. Idempotent.
    pub fn dispose<P>(&mut self, platform: &mut P)
    where
        P: Platform<Handle = H>,
    {
        if let Some(node) = self.node.take() {
            platform.remove_node(node);
        }
        self.placement = None;
    }

    /// Whether [`MarkerController::dispose`] has run (or nothing was created).
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.node.is_none()
    }
}
