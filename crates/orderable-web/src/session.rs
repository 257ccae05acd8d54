#![forbid(unsafe_code)]

//! Drag-reorder session lifecycle machine.
//!
//! ```text
//! Idle -> Active -> Idle
//!           |  ^
//!           +--+ (move, drop suppression)
//! ```
//!
//! A session owns one [`Snapshot`] for its whole lifetime. Every movement
//! re-ranks that snapshot from scratch, so the latest movement always wins and
//! only `closest`/`intent` carry forward between events. The marker is
//! created on start and disposed by whichever terminal transition runs
//! (`end` or `cancel`), so it never outlives its session.

use core::fmt;

use orderable_core::{Direction, Intent, Point, Snapshot, debug, info, resolve, trace};

use crate::marker::MarkerController;
use crate::platform::Platform;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragReorderState<H> {
    Idle,
    Active {
        dragged: H,
        closest: H,
        intent: Intent,
        direction: Direction,
    },
}

impl<H> DragReorderState<H> {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// Why a session ended without moving anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragCancelReason {
    /// The host window lost focus mid-drag.
    Blur,
    /// The page became hidden mid-drag.
    VisibilityHidden,
    /// The owning component is being torn down.
    Teardown,
    /// The host abandoned the drag without a drag-end.
    HostAbort,
}

/// Explicit no-op diagnostics for lifecycle events that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragReorderNoopReason {
    /// Movement over a container that had no children at start.
    EmptySnapshot,
    /// A second drop arrived in the same session.
    ///
    /// Only hosts driving the machine directly can see this; `Orderable`
    /// subscribes drop as a one-shot listener, so a second drop never reaches
    /// the machine.
    DropAlreadySuppressed,
}

/// Final structural move of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<H> {
    pub dragged: H,
    /// Sibling the dragged element was inserted next to.
    pub reference: H,
    pub intent: Intent,
}

impl<H: PartialEq> Placement<H> {
    /// The pointer never left the dragged element, so nothing moved.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.dragged == self.reference
    }
}

/// Transition effect emitted by one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragReorderEffect<H> {
    Started {
        dragged: H,
        sibling_count: usize,
        direction: Direction,
    },
    Moved {
        closest: H,
        intent: Intent,
        /// Page-coordinate pointer used for this ranking.
        pointer: Point,
        distance: f64,
    },
    DropSuppressed,
    Finished(Placement<H>),
    Canceled {
        dragged: H,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragReorderNoopReason,
    },
}

/// One state-machine transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragReorderTransition<H> {
    pub transition_id: u64,
    pub from: DragReorderState<H>,
    pub to: DragReorderState<H>,
    pub effect: DragReorderEffect<H>,
}

impl<H: Copy> DragReorderTransition<H> {
    /// Placement carried by a finishing transition.
    #[must_use]
    pub fn placement(&self) -> Option<Placement<H>> {
        match self.effect {
            DragReorderEffect::Finished(placement) => Some(placement),
            _ => None,
        }
    }
}

/// Lifecycle machine runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragReorderMachineError {
    /// A start arrived while another session is still active.
    SessionAlreadyActive,
    /// A move/drop/end arrived with no session.
    NoActiveSession,
}

impl fmt::Display for DragReorderMachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionAlreadyActive => write!(f, "a drag session is already active"),
            Self::NoActiveSession => write!(f, "no drag session is active"),
        }
    }
}

impl std::error::Error for DragReorderMachineError {}

#[derive(Debug, Clone)]
struct DragSession<H> {
    snapshot: Snapshot<H>,
    direction: Direction,
    dragged: H,
    closest: H,
    intent: Intent,
    marker: MarkerController<H>,
    drop_suppressed: bool,
    moves: u64,
}

impl<H: Copy> DragSession<H> {
    fn state(&self) -> DragReorderState<H> {
        DragReorderState::Active {
            dragged: self.dragged,
            closest: self.closest,
            intent: self.intent,
            direction: self.direction,
        }
    }
}

/// Runtime lifecycle machine for one container.
#[derive(Debug, Clone)]
pub struct DragReorderMachine<H> {
    session: Option<DragSession<H>>,
    transition_counter: u64,
}

impl<H> Default for DragReorderMachine<H> {
    fn default() -> Self {
        Self {
            session: None,
            transition_counter: 0,
        }
    }
}

impl<H: Copy + Eq + fmt::Debug> DragReorderMachine<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DragReorderState<H> {
        self.session
            .as_ref()
            .map_or(DragReorderState::Idle, DragSession::state)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Snapshot of the active session.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot<H>> {
        self.session.as_ref().map(|session| &session.snapshot)
    }

    /// Marker node of the active session.
    #[must_use]
    pub fn marker_node(&self) -> Option<H> {
        self.session
            .as_ref()
            .and_then(|session| session.marker.node())
    }

    /// Movement events applied in the active session.
    #[must_use]
    pub fn move_count(&self) -> u64 {
        self.session.as_ref().map_or(0, |session| session.moves)
    }

    /// Idle -> Active: snapshot the container and create the marker.
    ///
    /// `closest` starts as `dragged` and `intent` as [`Intent::After`], which
    /// together mean "no movement yet".
    pub fn start<P>(
        &mut self,
        platform: &mut P,
        container: H,
        dragged: H,
        marker_class: &str,
    ) -> Result<DragReorderTransition<H>, DragReorderMachineError>
    where
        P: Platform<Handle = H>,
    {
        if self.session.is_some() {
            return Err(DragReorderMachineError::SessionAlreadyActive);
        }
        let scroll = platform.scroll_offset();
        let children = platform.query_children(container);
        let snapshot = Snapshot::capture(
            children
                .into_iter()
                .map(|child| (child, platform.bounding_box(child))),
            scroll,
        );
        let direction = snapshot.direction();
        let sibling_count = snapshot.len();
        let marker = MarkerController::create(platform, dragged, marker_class);

        info!(
            dragged = ?dragged,
            sibling_count,
            direction = direction.as_str(),
            "orderable.session.start"
        );

        let session = DragSession {
            snapshot,
            direction,
            dragged,
            closest: dragged,
            intent: Intent::After,
            marker,
            drop_suppressed: false,
            moves: 0,
        };
        let to = session.state();
        self.session = Some(session);
        Ok(self.transition(
            DragReorderState::Idle,
            to,
            DragReorderEffect::Started {
                dragged,
                sibling_count,
                direction,
            },
        ))
    }

    /// Active -> Active: re-rank against `client` and move the marker.
    ///
    /// `client` is in viewport coordinates; the current scroll offset is
    /// added before ranking.
    pub fn on_move<P>(
        &mut self,
        platform: &mut P,
        client: Point,
    ) -> Result<DragReorderTransition<H>, DragReorderMachineError>
    where
        P: Platform<Handle = H>,
    {
        let Some(session) = self.session.as_mut() else {
            return Err(DragReorderMachineError::NoActiveSession);
        };
        let from = session.state();
        let pointer = client.to_page(platform.scroll_offset());
        let ranked = session.snapshot.rank(pointer);
        let Some(head) = ranked.first() else {
            return Ok(self.transition(
                from,
                from,
                DragReorderEffect::Noop {
                    reason: DragReorderNoopReason::EmptySnapshot,
                },
            ));
        };

        let closest = head.sibling.handle;
        let intent = resolve(session.direction, pointer, head.sibling.centroid);
        session.closest = closest;
        session.intent = intent;
        session.moves = session.moves.saturating_add(1);
        session.marker.place(platform, closest, intent);

        trace!(
            closest = ?closest,
            intent = intent.as_str(),
            distance = head.distance,
            "orderable.session.move"
        );

        let to = session.state();
        let effect = DragReorderEffect::Moved {
            closest,
            intent,
            pointer,
            distance: head.distance,
        };
        Ok(self.transition(from, to, effect))
    }

    /// Record that the platform's default drop was suppressed.
    ///
    /// Reported once per session; later drops are no-ops.
    pub fn suppress_drop(&mut self) -> Result<DragReorderTransition<H>, DragReorderMachineError> {
        let Some(session) = self.session.as_mut() else {
            return Err(DragReorderMachineError::NoActiveSession);
        };
        let state = session.state();
        let effect = if session.drop_suppressed {
            DragReorderEffect::Noop {
                reason: DragReorderNoopReason::DropAlreadySuppressed,
            }
        } else {
            session.drop_suppressed = true;
            DragReorderEffect::DropSuppressed
        };
        Ok(self.transition(state, state, effect))
    }

    /// Active -> Idle: dispose the marker and perform the structural move.
    pub fn end<P>(
        &mut self,
        platform: &mut P,
    ) -> Result<DragReorderTransition<H>, DragReorderMachineError>
    where
        P: Platform<Handle = H>,
    {
        let Some(mut session) = self.session.take() else {
            return Err(DragReorderMachineError::NoActiveSession);
        };
        let from = session.state();
        session.marker.dispose(platform);

        let placement = Placement {
            dragged: session.dragged,
            reference: session.closest,
            intent: session.intent,
        };
        if !placement.is_noop() {
            platform.insert_adjacent(placement.reference, placement.intent, placement.dragged);
        }

        debug!(
            dragged = ?placement.dragged,
            reference = ?placement.reference,
            intent = placement.intent.as_str(),
            moves = session.moves,
            "orderable.session.end"
        );

        Ok(self.transition(
            from,
            DragReorderState::Idle,
            DragReorderEffect::Finished(placement),
        ))
    }

    /// Active -> Idle without moving anything.
    ///
    /// Returns `None` when already idle.
    pub fn cancel<P>(
        &mut self,
        platform: &mut P,
        reason: DragCancelReason,
    ) -> Option<DragReorderTransition<H>>
    where
        P: Platform<Handle = H>,
    {
        let mut session = self.session.take()?;
        let from = session.state();
        session.marker.dispose(platform);

        debug!(dragged = ?session.dragged, reason = ?reason, "orderable.session.cancel");

        Some(self.transition(
            from,
            DragReorderState::Idle,
            DragReorderEffect::Canceled {
                dragged: session.dragged,
                reason,
            },
        ))
    }

    fn transition(
        &mut self,
        from: DragReorderState<H>,
        to: DragReorderState<H>,
        effect: DragReorderEffect<H>,
    ) -> DragReorderTransition<H> {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragReorderTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryPlatform, NodeId};
    use orderable_core::Rect;
    use pretty_assertions::assert_eq;

    const MARKER: &str = "orderable__insertion-marker";

    /// Three 20x20 items whose centroids sit at (0,0), (100,0), (200,0).
    fn row() -> (MemoryPlatform, NodeId, [NodeId; 3]) {
        let mut platform = MemoryPlatform::new();
        let root = platform.create_container("orderable");
        let a = platform.append_child(root, "li", Rect::new(-10.0, -10.0, 20.0, 20.0));
        let b = platform.append_child(root, "li", Rect::new(90.0, -10.0, 20.0, 20.0));
        let c = platform.append_child(root, "li", Rect::new(190.0, -10.0, 20.0, 20.0));
        (platform, root, [a, b, c])
    }

    #[test]
    fn start_snapshots_and_defaults() {
        let (mut platform, root, [a, _, _]) = row();
        let mut machine = DragReorderMachine::new();
        let t = machine
            .start(&mut platform, root, a, MARKER)
            .expect("start from idle");
        assert_eq!(t.transition_id, 1);
        assert_eq!(t.from, DragReorderState::Idle);
        assert_eq!(
            t.to,
            DragReorderState::Active {
                dragged: a,
                closest: a,
                intent: Intent::After,
                direction: Direction::Horizontal,
            }
        );
        assert_eq!(
            t.effect,
            DragReorderEffect::Started {
                dragged: a,
                sibling_count: 3,
                direction: Direction::Horizontal,
            }
        );
        let snapshot = machine.snapshot().expect("snapshot");
        assert_eq!(snapshot.entries()[2].centroid, Point::new(200.0, 0.0));
        // Marker exists but is not in the tree until the first move.
        let marker = machine.marker_node().expect("marker");
        assert_eq!(platform.parent(marker), None);
        assert!(platform.has_class(marker, MARKER));
    }

    #[test]
    fn reentrant_start_is_rejected_without_side_effects() {
        let (mut platform, root, [a, b, _]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, a, MARKER).expect("start");
        let before = machine.state();
        assert_eq!(
            machine.start(&mut platform, root, b, MARKER),
            Err(DragReorderMachineError::SessionAlreadyActive)
        );
        assert_eq!(machine.state(), before);
    }

    #[test]
    fn move_ranks_resolves_and_places_marker() {
        let (mut platform, root, [a, b, c]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, a, MARKER).expect("start");
        let marker = machine.marker_node().expect("marker");

        let t = machine
            .on_move(&mut platform, Point::new(170.0, 5.0))
            .expect("move");
        assert!(matches!(
            t.effect,
            DragReorderEffect::Moved {
                closest,
                intent: Intent::Before,
                ..
            } if closest == c
        ));
        assert_eq!(platform.children(root), &[a, b, marker, c]);

        // A later move fully supersedes the earlier one.
        machine
            .on_move(&mut platform, Point::new(104.0, -3.0))
            .expect("move");
        assert_eq!(platform.children(root), &[a, b, marker, c]);
        assert_eq!(
            machine.state(),
            DragReorderState::Active {
                dragged: a,
                closest: b,
                intent: Intent::After,
                direction: Direction::Horizontal,
            }
        );
        assert_eq!(machine.move_count(), 2);
    }

    #[test]
    fn move_uses_scroll_adjusted_pointer() {
        let (mut platform, root, [a, _, c]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, a, MARKER).expect("start");
        // Scrolling after the snapshot shifts the pointer, not the centroids.
        platform.set_scroll_offset(Point::new(100.0, 0.0));
        let t = machine
            .on_move(&mut platform, Point::new(95.0, 0.0))
            .expect("move");
        assert!(matches!(
            t.effect,
            DragReorderEffect::Moved { closest, intent: Intent::Before, pointer, .. }
                if closest == c && pointer == Point::new(195.0, 0.0)
        ));
    }

    #[test]
    fn end_moves_dragged_next_to_closest() {
        let (mut platform, root, [a, b, c]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, a, MARKER).expect("start");
        machine
            .on_move(&mut platform, Point::new(170.0, 0.0))
            .expect("move");
        let t = machine.end(&mut platform).expect("end");
        assert_eq!(
            t.placement(),
            Some(Placement {
                dragged: a,
                reference: c,
                intent: Intent::Before,
            })
        );
        assert_eq!(t.to, DragReorderState::Idle);
        assert_eq!(platform.children(root), &[b, a, c]);
        assert!(!machine.is_active());
    }

    #[test]
    fn end_without_move_is_a_noop_placement() {
        let (mut platform, root, [a, b, c]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, a, MARKER).expect("start");
        let placement = machine
            .end(&mut platform)
            .expect("end")
            .placement()
            .expect("placement");
        assert!(placement.is_noop());
        assert_eq!(placement.intent, Intent::After);
        assert_eq!(platform.children(root), &[a, b, c]);
    }

    #[test]
    fn closest_to_itself_leaves_order_unchanged() {
        let (mut platform, root, [a, b, c]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, b, MARKER).expect("start");
        machine
            .on_move(&mut platform, Point::new(95.0, 0.0))
            .expect("move");
        let placement = machine
            .end(&mut platform)
            .expect("end")
            .placement()
            .expect("placement");
        assert_eq!(placement.reference, b);
        assert_eq!(placement.intent, Intent::Before);
        assert_eq!(platform.children(root), &[a, b, c]);
    }

    #[test]
    fn end_and_cancel_remove_marker() {
        let (mut platform, root, [a, _, _]) = row();
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, a, MARKER).expect("start");
        machine
            .on_move(&mut platform, Point::new(120.0, 0.0))
            .expect("move");
        assert_eq!(platform.children(root).len(), 4);
        machine.end(&mut platform).expect("end");
        assert_eq!(platform.children(root).len(), 3);

        machine.start(&mut platform, root, a, MARKER).expect("restart");
        machine
            .on_move(&mut platform, Point::new(120.0, 0.0))
            .expect("move");
        let t = machine
            .cancel(&mut platform, DragCancelReason::Blur)
            .expect("cancel active");
        assert_eq!(
            t.effect,
            DragReorderEffect::Canceled {
                dragged: a,
                reason: DragCancelReason::Blur,
            }
        );
        assert_eq!(platform.children(root).len(), 3);
        assert!(
            machine
                .cancel(&mut platform, DragCancelReason::Blur)
                .is_none()
        );
    }

    #[test]
    fn drop_is_suppressed_once_per_session() {
        let (mut platform, root, [a, _, _]) = row();
        let mut machine = DragReorderMachine::new();
        assert_eq!(
            machine.suppress_drop(),
            Err(DragReorderMachineError::NoActiveSession)
        );
        machine.start(&mut platform, root, a, MARKER).expect("start");
        let first = machine.suppress_drop().expect("drop");
        assert_eq!(first.effect, DragReorderEffect::DropSuppressed);
        assert_eq!(first.from, first.to);
        let second = machine.suppress_drop().expect("drop");
        assert_eq!(
            second.effect,
            DragReorderEffect::Noop {
                reason: DragReorderNoopReason::DropAlreadySuppressed
            }
        );
    }

    #[test]
    fn idle_move_and_end_are_rejected() {
        let (mut platform, _, _) = row();
        let mut machine: DragReorderMachine<NodeId> = DragReorderMachine::new();
        assert_eq!(
            machine.on_move(&mut platform, Point::ORIGIN),
            Err(DragReorderMachineError::NoActiveSession)
        );
        assert_eq!(
            machine.end(&mut platform),
            Err(DragReorderMachineError::NoActiveSession)
        );
    }

    #[test]
    fn empty_container_move_is_noop() {
        let mut platform = MemoryPlatform::new();
        let root = platform.create_container("orderable");
        let stray = platform.create_container("stray");
        let mut machine = DragReorderMachine::new();
        machine.start(&mut platform, root, stray, MARKER).expect("start");
        let t = machine
            .on_move(&mut platform, Point::new(1.0, 1.0))
            .expect("move");
        assert_eq!(
            t.effect,
            DragReorderEffect::Noop {
                reason: DragReorderNoopReason::EmptySnapshot
            }
        );
        machine.end(&mut platform).expect("end");
    }

    #[test]
    fn many_cycles_leave_no_markers_behind() {
        let (mut platform, root, items) = row();
        let mut machine = DragReorderMachine::new();
        for cycle in 0..50u32 {
            let dragged = items[(cycle % 3) as usize];
            machine
                .start(&mut platform, root, dragged, MARKER)
                .expect("start");
            for step in 0..5u32 {
                let x = f64::from((cycle * 37 + step * 53) % 240) - 20.0;
                machine
                    .on_move(&mut platform, Point::new(x, 0.0))
                    .expect("move");
            }
            if cycle % 7 == 0 {
                machine.cancel(&mut platform, DragCancelReason::HostAbort);
            } else {
                machine.end(&mut platform).expect("end");
            }
            assert_eq!(platform.children(root).len(), 3);
        }
        let mut sorted = platform.children(root).to_vec();
        sorted.sort();
        let mut expected = items.to_vec();
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
