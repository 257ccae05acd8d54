#![forbid(unsafe_code)]

//! Engine-side mirror of platform subscriptions.
//!
//! Hosts deliver every event to [`crate::Orderable::dispatch`]; the registry
//! decides whether a listener is actually attached for it. One-shot listeners
//! are consumed on delivery, matching platforms that auto-detach them.

use crate::platform::{DragEventKind, ListenOptions, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listener<H> {
    target: H,
    kind: DragEventKind,
    once: bool,
}

/// Set of attached listeners, at most one per `(target, kind)`.
#[derive(Debug, Clone)]
pub struct ListenerRegistry<H> {
    listeners: Vec<Listener<H>>,
}

impl<H> Default for ListenerRegistry<H> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> ListenerRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener on the platform and record it.
    ///
    /// Re-attaching an existing `(target, kind)` only updates its options.
    pub fn attach<P>(
        &mut self,
        platform: &mut P,
        target: H,
        kind: DragEventKind,
        options: ListenOptions,
    ) where
        P: Platform<Handle = H>,
    {
        if let Some(existing) = self
            .listeners
            .iter_mut()
            .find(|l| l.target == target && l.kind == kind)
        {
            if existing.once == options.once {
                return;
            }
            platform.unlisten(target, kind);
            existing.once = options.once;
        } else {
            self.listeners.push(Listener {
                target,
                kind,
                once: options.once,
            });
        }
        platform.listen(target, kind, options);
    }

    /// Detach a listener if attached. Returns whether one was removed.
    pub fn detach<P>(&mut self, platform: &mut P, target: H, kind: DragEventKind) -> bool
    where
        P: Platform<Handle = H>,
    {
        let before = self.listeners.len();
        self.listeners.retain(|l| !(l.target == target && l.kind == kind));
        let removed = self.listeners.len() != before;
        if removed {
            platform.unlisten(target, kind);
        }
        removed
    }

    /// Targets currently listening for `kind`, in attach order.
    #[must_use]
    pub fn targets(&self, kind: DragEventKind) -> Vec<H> {
        self.listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.target)
            .collect()
    }

    /// Detach everything.
    pub fn detach_all<P>(&mut self, platform: &mut P)
    where
        P: Platform<Handle = H>,
    {
        for listener in self.listeners.drain(..) {
            platform.unlisten(listener.target, listener.kind);
        }
    }

    /// Claim delivery of one event.
    ///
    /// Returns `false` when nothing listens for `(target, kind)`. A one-shot
    /// listener is dropped from the registry here and the platform is told it
    /// fired.
    pub fn deliver<P>(&mut self, platform: &mut P, target: H, kind: DragEventKind) -> bool
    where
        P: Platform<Handle = H>,
    {
        let Some(pos) = self
            .listeners
            .iter()
            .position(|l| l.target == target && l.kind == kind)
        else {
            return false;
        };
        if self.listeners[pos].once {
            self.listeners.remove(pos);
            platform.once_listener_fired(target, kind);
        }
        true
    }

    #[must_use]
    pub fn is_attached(&self, target: H, kind: DragEventKind) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
