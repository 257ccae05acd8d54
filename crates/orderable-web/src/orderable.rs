#![forbid(unsafe_code)]

//! Host-driven drag-reorder adapter for one container.
//!
//! [`Orderable`] bridges host drag lifecycle events into
//! [`DragReorderMachine`] transitions while enforcing:
//! - one active session per container,
//! - listener discipline (movement and end listeners exist only while a
//!   session is active, drop/end are one-shot), and
//! - cleanup on interruption paths (abort, teardown, drop of the adapter).
//!
//! Every call returns an [`OrderableDispatch`] carrying the transition, an
//! optional host command (`preventDefault()` for DOM hosts), and a structured
//! log entry.

use core::fmt;

use orderable_core::{Intent, Point, debug, debug_span, warn};

use crate::listeners::ListenerRegistry;
use crate::platform::{DragEvent, DragEventKind, ListenOptions, Platform};
use crate::session::{
    DragCancelReason, DragReorderMachine, DragReorderMachineError, DragReorderState,
    DragReorderTransition,
};

/// Default container class name.
pub const DEFAULT_CLASS_NAME: &str = "orderable";

/// Adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderableConfig {
    /// Class that identifies the container; derived class names build on it.
    pub class_name: String,
}

impl Default for OrderableConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_owned(),
        }
    }
}

impl OrderableConfig {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    /// Class carried by the insertion marker.
    #[must_use]
    pub fn marker_class(&self) -> String {
        format!("{}__insertion-marker", self.class_name)
    }

    /// Class a start hook may apply to the dragged element.
    #[must_use]
    pub fn selected_class(&self) -> String {
        format!("{}__selected", self.class_name)
    }

    fn validate(&self) -> Result<(), OrderableError> {
        if self.class_name.trim().is_empty() {
            return Err(OrderableError::InvalidConfig("class name must not be empty"));
        }
        if self.class_name.chars().any(char::is_whitespace) {
            return Err(OrderableError::InvalidConfig(
                "class name must not contain whitespace",
            ));
        }
        Ok(())
    }
}

/// Construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderableError {
    /// Configuration rejected before touching the platform.
    InvalidConfig(&'static str),
    /// No container carries the configured class.
    MissingContainer { class_name: String },
}

impl fmt::Display for OrderableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::MissingContainer { class_name } => {
                write!(f, "no container with class `{class_name}`")
            }
        }
    }
}

impl std::error::Error for OrderableError {}

/// Host command emitted alongside a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderableHostCommand {
    /// Suppress the platform's default handling of the event.
    PreventDefault,
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderableLifecyclePhase {
    DragStart,
    DragOver,
    Drop,
    DragEnd,
    Abort,
}

impl From<DragEventKind> for OrderableLifecyclePhase {
    fn from(kind: DragEventKind) -> Self {
        match kind {
            DragEventKind::DragStart => Self::DragStart,
            DragEventKind::DragOver => Self::DragOver,
            DragEventKind::Drop => Self::Drop,
            DragEventKind::DragEnd => Self::DragEnd,
        }
    }
}

/// Deterministic reason why an incoming event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderableIgnoredReason {
    /// Nothing listens for this `(target, kind)`.
    NoListener,
    SessionAlreadyActive,
    NoActiveSession,
}

impl From<DragReorderMachineError> for OrderableIgnoredReason {
    fn from(error: DragReorderMachineError) -> Self {
        match error {
            DragReorderMachineError::SessionAlreadyActive => Self::SessionAlreadyActive,
            DragReorderMachineError::NoActiveSession => Self::NoActiveSession,
        }
    }
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderableLogOutcome {
    Forwarded,
    Ignored(OrderableIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderableLogEntry<H> {
    pub phase: OrderableLifecyclePhase,
    pub sequence: Option<u64>,
    pub target: Option<H>,
    /// Pointer position in viewport coordinates.
    pub position: Option<Point>,
    pub host_command: Option<OrderableHostCommand>,
    pub outcome: OrderableLogOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderableDispatch<H> {
    pub transition: Option<DragReorderTransition<H>>,
    pub host_command: Option<OrderableHostCommand>,
    pub log: OrderableLogEntry<H>,
}

impl<H> OrderableDispatch<H> {
    fn ignored(
        phase: OrderableLifecyclePhase,
        reason: OrderableIgnoredReason,
        target: Option<H>,
        position: Option<Point>,
    ) -> Self {
        Self {
            transition: None,
            host_command: None,
            log: OrderableLogEntry {
                phase,
                sequence: None,
                target,
                position,
                host_command: None,
                outcome: OrderableLogOutcome::Ignored(reason),
            },
        }
    }

    /// Whether the host must suppress the platform default.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(
            self.host_command,
            Some(OrderableHostCommand::PreventDefault)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DispatchContext<H> {
    phase: OrderableLifecyclePhase,
    target: Option<H>,
    position: Option<Point>,
}

type StartHook<P> = Box<dyn FnMut(&mut P, <P as Platform>::Handle)>;
type DropHook<P> =
    Box<dyn FnMut(&mut P, <P as Platform>::Handle, <P as Platform>::Handle, Intent)>;

/// Drag-reorder adapter bound to one container.
///
/// Owns the platform for its lifetime; [`Orderable::platform`] and
/// [`Orderable::platform_mut`] give hosts access in between dispatches.
pub struct Orderable<P: Platform> {
    platform: P,
    config: OrderableConfig,
    container: P::Handle,
    machine: DragReorderMachine<P::Handle>,
    listeners: ListenerRegistry<P::Handle>,
    on_start: Option<StartHook<P>>,
    on_drop: Option<DropHook<P>>,
    next_sequence: u64,
}

impl<P: Platform + fmt::Debug> fmt::Debug for Orderable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orderable")
            .field("platform", &self.platform)
            .field("config", &self.config)
            .field("container", &self.container)
            .field("machine", &self.machine)
            .field("listeners", &self.listeners)
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}

impl<P: Platform> Orderable<P> {
    /// Resolve the container and subscribe drag-start on its children.
    pub fn new(mut platform: P, config: OrderableConfig) -> Result<Self, OrderableError> {
        config.validate()?;
        let Some(container) = platform.resolve_container(&config.class_name) else {
            return Err(OrderableError::MissingContainer {
                class_name: config.class_name,
            });
        };
        let mut listeners = ListenerRegistry::new();
        for child in platform.query_children(container) {
            listeners.attach(
                &mut platform,
                child,
                DragEventKind::DragStart,
                ListenOptions::PERSISTENT,
            );
        }
        debug!(
            class_name = config.class_name.as_str(),
            children = listeners.len(),
            "orderable.attach"
        );
        Ok(Self {
            platform,
            config,
            container,
            machine: DragReorderMachine::new(),
            listeners,
            on_start: None,
            on_drop: None,
            next_sequence: 1,
        })
    }

    /// Hook run after a session starts, with the dragged element.
    #[must_use]
    pub fn with_on_start(mut self, hook: impl FnMut(&mut P, P::Handle) + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Hook run after the structural move, with `(dragged, reference, intent)`.
    ///
    /// Also runs when nothing moved (reference is the dragged element).
    #[must_use]
    pub fn with_on_drop(
        mut self,
        hook: impl FnMut(&mut P, P::Handle, P::Handle, Intent) + 'static,
    ) -> Self {
        self.on_drop = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn config(&self) -> &OrderableConfig {
        &self.config
    }

    #[must_use]
    pub fn container(&self) -> P::Handle {
        self.container
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable platform access. Structural edits made here mid-drag are not
    /// seen by the active session's snapshot.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Current session lifecycle state.
    #[must_use]
    pub fn state(&self) -> DragReorderState<P::Handle> {
        self.machine.state()
    }

    /// Underlying lifecycle machine.
    #[must_use]
    pub fn machine(&self) -> &DragReorderMachine<P::Handle> {
        &self.machine
    }

    /// Whether an engine listener is attached for `(target, kind)`.
    #[must_use]
    pub fn is_listening(&self, target: P::Handle, kind: DragEventKind) -> bool {
        self.listeners.is_attached(target, kind)
    }

    /// Route one host event.
    pub fn dispatch(&mut self, event: DragEvent<P::Handle>) -> OrderableDispatch<P::Handle> {
        let span = debug_span!("orderable.dispatch", kind = event.kind.as_str());
        let _guard = span.enter();
        let context = DispatchContext {
            phase: event.kind.into(),
            target: Some(event.target),
            position: Some(event.client),
        };
        if !self
            .listeners
            .deliver(&mut self.platform, event.target, event.kind)
        {
            debug!(
                kind = event.kind.as_str(),
                handle = ?event.target,
                "orderable.dispatch.ignored"
            );
            return OrderableDispatch::ignored(
                context.phase,
                OrderableIgnoredReason::NoListener,
                context.target,
                context.position,
            );
        }

        match event.kind {
            DragEventKind::DragStart => self.begin(context, event.target),
            DragEventKind::DragOver => self.movement(context, event.client),
            DragEventKind::Drop => self.suppress_drop(context),
            DragEventKind::DragEnd => self.finish(context),
        }
    }

    /// Cancel the active session without moving anything.
    ///
    /// For drags the platform abandons without a drag-end (blur, hidden page,
    /// lost capture). Detaches the session's listeners.
    pub fn abort(&mut self, reason: DragCancelReason) -> OrderableDispatch<P::Handle> {
        let DragReorderState::Active { dragged, .. } = self.machine.state() else {
            return OrderableDispatch::ignored(
                OrderableLifecyclePhase::Abort,
                OrderableIgnoredReason::NoActiveSession,
                None,
                None,
            );
        };
        let transition = self.machine.cancel(&mut self.platform, reason);
        self.detach_session_listeners(dragged);
        self.forwarded(
            DispatchContext {
                phase: OrderableLifecyclePhase::Abort,
                target: Some(dragged),
                position: None,
            },
            transition,
            None,
        )
    }

    /// Abort any session and detach every listener. Idempotent.
    ///
    /// Runs automatically when the adapter is dropped.
    pub fn teardown(&mut self) {
        if self.machine.is_active() {
            let _ = self.abort(DragCancelReason::Teardown);
        }
        self.listeners.detach_all(&mut self.platform);
    }

    /// Re-sync drag-start listeners with the container's current children.
    ///
    /// Children added since construction become draggable; listeners on
    /// removed children are detached. Returns the number of children now
    /// listened to.
    pub fn refresh_children(&mut self) -> usize {
        let marker = self.machine.marker_node();
        let children: Vec<P::Handle> = self
            .platform
            .query_children(self.container)
            .into_iter()
            .filter(|child| Some(*child) != marker)
            .collect();
        for stale in self.listeners.targets(DragEventKind::DragStart) {
            if !children.contains(&stale) {
                self.listeners
                    .detach(&mut self.platform, stale, DragEventKind::DragStart);
            }
        }
        for child in &children {
            self.listeners.attach(
                &mut self.platform,
                *child,
                DragEventKind::DragStart,
                ListenOptions::PERSISTENT,
            );
        }
        children.len()
    }

    fn begin(
        &mut self,
        context: DispatchContext<P::Handle>,
        dragged: P::Handle,
    ) -> OrderableDispatch<P::Handle> {
        let marker_class = self.config.marker_class();
        match self
            .machine
            .start(&mut self.platform, self.container, dragged, &marker_class)
        {
            Ok(transition) => {
                self.listeners.attach(
                    &mut self.platform,
                    self.container,
                    DragEventKind::DragOver,
                    ListenOptions::PERSISTENT,
                );
                self.listeners.attach(
                    &mut self.platform,
                    self.container,
                    DragEventKind::Drop,
                    ListenOptions::ONCE,
                );
                self.listeners.attach(
                    &mut self.platform,
                    dragged,
                    DragEventKind::DragEnd,
                    ListenOptions::ONCE,
                );
                if let Some(hook) = self.on_start.as_mut() {
                    hook(&mut self.platform, dragged);
                }
                self.forwarded(context, Some(transition), None)
            }
            Err(error) => {
                warn!(dragged = ?dragged, %error, "orderable.start.rejected");
                self.rejected(context, error)
            }
        }
    }

    fn movement(
        &mut self,
        context: DispatchContext<P::Handle>,
        client: Point,
    ) -> OrderableDispatch<P::Handle> {
        match self.machine.on_move(&mut self.platform, client) {
            Ok(transition) => self.forwarded(
                context,
                Some(transition),
                Some(OrderableHostCommand::PreventDefault),
            ),
            Err(error) => self.rejected(context, error),
        }
    }

    fn suppress_drop(&mut self, context: DispatchContext<P::Handle>) -> OrderableDispatch<P::Handle> {
        match self.machine.suppress_drop() {
            Ok(transition) => self.forwarded(
                context,
                Some(transition),
                Some(OrderableHostCommand::PreventDefault),
            ),
            Err(error) => self.rejected(context, error),
        }
    }

    fn finish(&mut self, context: DispatchContext<P::Handle>) -> OrderableDispatch<P::Handle> {
        let transition = match self.machine.end(&mut self.platform) {
            Ok(transition) => transition,
            Err(error) => return self.rejected(context, error),
        };
        let Some(placement) = transition.placement() else {
            return self.forwarded(context, Some(transition), None);
        };
        self.detach_session_listeners(placement.dragged);
        if let Some(hook) = self.on_drop.as_mut() {
            hook(
                &mut self.platform,
                placement.dragged,
                placement.reference,
                placement.intent,
            );
        }
        self.forwarded(
            context,
            Some(transition),
            Some(OrderableHostCommand::PreventDefault),
        )
    }

    fn detach_session_listeners(&mut self, dragged: P::Handle) {
        self.listeners
            .detach(&mut self.platform, self.container, DragEventKind::DragOver);
        self.listeners
            .detach(&mut self.platform, self.container, DragEventKind::Drop);
        self.listeners
            .detach(&mut self.platform, dragged, DragEventKind::DragEnd);
    }

    fn forwarded(
        &mut self,
        context: DispatchContext<P::Handle>,
        transition: Option<DragReorderTransition<P::Handle>>,
        host_command: Option<OrderableHostCommand>,
    ) -> OrderableDispatch<P::Handle> {
        let sequence = Some(self.next_sequence());
        OrderableDispatch {
            transition,
            host_command,
            log: OrderableLogEntry {
                phase: context.phase,
                sequence,
                target: context.target,
                position: context.position,
                host_command,
                outcome: OrderableLogOutcome::Forwarded,
            },
        }
    }

    fn rejected(
        &self,
        context: DispatchContext<P::Handle>,
        error: DragReorderMachineError,
    ) -> OrderableDispatch<P::Handle> {
        OrderableDispatch::ignored(
            context.phase,
            error.into(),
            context.target,
            context.position,
        )
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }
}

impl<P: Platform> Drop for Orderable<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
