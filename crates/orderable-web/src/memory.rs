#![forbid(unsafe_code)]

//! Headless in-memory platform.
//!
//! [`MemoryPlatform`] keeps a small node arena with explicit bounding boxes
//! and a listener table. Layout is slot-based: the rectangles of a parent's
//! host-created children form fixed slots, and moving one of those children
//! hands the slots out again in the new child order. Nodes made by
//! [`Platform::create_node`] (markers) take no slot and their arena entry is
//! recycled once removed, so the arena stays bounded across any number of
//! sessions. Useful for tests, benches, and hosts that model their own tree.

use orderable_core::{Intent, Point, Rect};

use crate::platform::{DragEventKind, ListenOptions, Platform};

/// Index of a node in a [`MemoryPlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Rect,
    /// Made by `create_node`; takes no layout slot, recycled on removal.
    transient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoryListener {
    target: NodeId,
    kind: DragEventKind,
    options: ListenOptions,
}

/// In-memory visual tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryPlatform {
    nodes: Vec<MemoryNode>,
    scroll: Point,
    listeners: Vec<MemoryListener>,
    free: Vec<NodeId>,
}

impl MemoryPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self, node: MemoryNode) -> NodeId {
        if let Some(id) = self.free.pop() {
            if let Some(slot) = self.node_mut(id) {
                *slot = node;
                return id;
            }
        }
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn new_node(tag: &str, class_name: Option<&str>, bounds: Rect, transient: bool) -> MemoryNode {
        MemoryNode {
            tag: tag.to_owned(),
            classes: class_name.map(str::to_owned).into_iter().collect(),
            parent: None,
            children: Vec::new(),
            bounds,
            transient,
        }
    }

    fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(id.0)
    }

    /// Arena entries ever allocated, live or recycled.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Arena entries currently in use.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Create a root container carrying `class_name`.
    pub fn create_container(&mut self, class_name: &str) -> NodeId {
        self.push_node(Self::new_node("ul", Some(class_name), Rect::default(), false))
    }

    /// Append a new `tag` child to `parent` with fixed `bounds`.
    pub fn append_child(&mut self, parent: NodeId, tag: &str, bounds: Rect) -> NodeId {
        let id = self.push_node(Self::new_node(tag, None, bounds, false));
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(parent);
        }
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// Children of `parent`, in order.
    #[must_use]
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        self.node(parent)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    #[must_use]
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.node(id)
            .is_some_and(|node| node.classes.iter().any(|c| c == class_name))
    }

    /// Add or remove a class. Useful from start/drop hooks.
    pub fn set_class(&mut self, id: NodeId, class_name: &str, enabled: bool) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let present = node.classes.iter().any(|c| c == class_name);
        if enabled && !present {
            node.classes.push(class_name.to_owned());
        } else if !enabled && present {
            node.classes.retain(|c| c != class_name);
        }
    }

    /// Replace a node's rectangle.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.bounds = bounds;
        }
    }

    /// Host-created children of `parent`, in order, with their rectangles.
    fn layout_slots(&self, parent: NodeId) -> Vec<(NodeId, Rect)> {
        self.children(parent)
            .iter()
            .filter_map(|child| self.node(*child).map(|node| (*child, node)))
            .filter(|(_, node)| !node.transient)
            .map(|(child, node)| (child, node.bounds))
            .collect()
    }

    /// Hand `slots` out to the host-created children of `parent` in order.
    fn reflow(&mut self, parent: NodeId, slots: &[(NodeId, Rect)]) {
        let order: Vec<NodeId> = self
            .layout_slots(parent)
            .into_iter()
            .map(|(child, _)| child)
            .collect();
        for (child, (_, bounds)) in order.into_iter().zip(slots) {
            self.set_bounds(child, *bounds);
        }
    }

    pub fn set_scroll_offset(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    #[must_use]
    pub fn has_listener(&self, target: NodeId, kind: DragEventKind) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.kind == kind)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of attached listeners of `kind`.
    #[must_use]
    pub fn listener_count_of(&self, kind: DragEventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    /// Whether `target` listens for `kind` with one-shot semantics.
    #[must_use]
    pub fn is_once_listener(&self, target: NodeId, kind: DragEventKind) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.kind == kind && l.options.once)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|child| *child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }
}

impl Platform for MemoryPlatform {
    type Handle = NodeId;

    fn resolve_container(&self, class_name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.classes.iter().any(|c| c == class_name))
            .map(NodeId)
    }

    fn query_children(&self, container: NodeId) -> Vec<NodeId> {
        self.children(container).to_vec()
    }

    fn bounding_box(&self, handle: NodeId) -> Rect {
        self.node(handle).map(|node| node.bounds).unwrap_or_default()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn insert_adjacent(&mut self, reference: NodeId, side: Intent, node: NodeId) {
        if reference == node {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        let relayout = self.parent(node) == Some(parent)
            && self.node(node).is_some_and(|moved| !moved.transient);
        let slots = if relayout {
            self.layout_slots(parent)
        } else {
            Vec::new()
        };
        self.detach(node);
        let Some(position) = self
            .children(parent)
            .iter()
            .position(|child| *child == reference)
        else {
            return;
        };
        let index = match side {
            Intent::Before => position,
            Intent::After => position + 1,
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.insert(index, node);
        }
        if let Some(moved) = self.node_mut(node) {
            moved.parent = Some(parent);
        }
        if relayout {
            self.reflow(parent, &slots);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        self.detach(node);
        let recycle = self
            .node(node)
            .is_some_and(|n| n.transient && !self.free.contains(&node));
        if recycle {
            self.listeners.retain(|l| l.target != node);
            if let Some(slot) = self.node_mut(node) {
                slot.classes.clear();
                slot.children.clear();
            }
            self.free.push(node);
        }
    }

    fn create_node(&mut self, like: NodeId, class_name: &str) -> NodeId {
        let tag = self.tag(like).unwrap_or("div").to_owned();
        self.push_node(Self::new_node(&tag, Some(class_name), Rect::default(), true))
    }

    fn listen(&mut self, handle: NodeId, kind: DragEventKind, options: ListenOptions) {
        self.listeners
            .retain(|l| !(l.target == handle && l.kind == kind));
        self.listeners.push(MemoryListener {
            target: handle,
            kind,
            options,
        });
    }

    fn unlisten(&mut self, handle: NodeId, kind: DragEventKind) {
        self.listeners
            .retain(|l| !(l.target == handle && l.kind == kind));
    }

    fn once_listener_fired(&mut self, handle: NodeId, kind: DragEventKind) {
        self.listeners
            .retain(|l| !(l.target == handle && l.kind == kind && l.options.once));
    }
}
