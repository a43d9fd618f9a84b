use std::collections::VecDeque;

use slotmap::SlotMap;
use tracing::{trace, warn};

use crate::{
    NodeId,
    error::{Error, Result},
    event::{Channel, EventKind, Listener},
    geom::{Axis, Point, Size},
    invalidation::{InvalidationState, LayoutActions, StateHandle},
    layout::LayoutSpec,
    node::{Node, ResourceId, UniformFn},
    state::NodeName,
    widgets::NodeKind,
};

/// The node arena for one window, plus the resolved paint order.
pub struct Scene {
    /// Node storage.
    nodes: SlotMap<NodeId, Node>,
    /// The window root.
    root: NodeId,
    /// Shared window state, handed to every attached node.
    state: StateHandle,
    /// Visible nodes sorted by ascending depth.
    paint: Vec<NodeId>,
    /// Serial for the next created node.
    next_serial: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(InvalidationState::shared(Size::ZERO))
    }
}

impl Scene {
    /// Create a scene with a root node filling the window.
    pub fn new(state: StateHandle) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = Node::new(0, NodeKind::Box, NodeName::convert("root"));
        root_node.layout = LayoutSpec::fill();
        root_node.state = Some(state.clone());
        let root = nodes.insert(root_node);
        Self {
            nodes,
            root,
            state,
            paint: vec![root],
            next_serial: 1,
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The shared window state.
    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Return a reference to a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Return a mutable reference to a node by id.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Return a node or a `NodeNotFound` error.
    pub(crate) fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Return a mutable node or a `NodeNotFound` error.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Does the arena hold this id?
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty? Never true, since the root always exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A node's parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// A node's children, or an empty slice for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Painted nodes, back to front.
    pub fn paint_order(&self) -> &[NodeId] {
        &self.paint
    }

    /// Create a detached node. The name is converted to a valid node name.
    pub fn create(&mut self, kind: NodeKind, name: &str) -> NodeId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let id = self
            .nodes
            .insert(Node::new(serial, kind, NodeName::convert(name)));
        trace!(?id, name, "create");
        id
    }

    /// Create a detached node with a layout.
    pub fn create_with(&mut self, kind: NodeKind, name: &str, layout: LayoutSpec) -> NodeId {
        let id = self.create(kind, name);
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout = layout;
        }
        id
    }

    /// Is `ancestor` a strict ancestor of `node`?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append a detached child to a parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if let Err(e) = self.check_append(parent, child) {
            warn!(?parent, ?child, "append rejected: {e}");
            return Err(e);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self.tree_changed(parent);
        Ok(())
    }

    /// Validate an append without mutating anything.
    fn check_append(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        let c = self.get(child)?;
        if child == self.root {
            return Err(Error::RootOperation);
        }
        if c.parent.is_some() {
            return Err(Error::AlreadyParented(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        Ok(())
    }

    /// Detach a node from its parent. The node and its descendants lose
    /// their window state; input references into the subtree are cleared.
    /// Removing a detached node does nothing.
    pub fn remove(&mut self, child: NodeId) -> Result<()> {
        if child == self.root {
            warn!("remove rejected: root");
            return Err(Error::RootOperation);
        }
        let node = self.get(child)?;
        let Some(parent) = node.parent else {
            return Ok(());
        };
        let state = self
            .nodes
            .get(parent)
            .and_then(|p| p.state.clone())
            .or_else(|| node.state.clone());

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|id| *id != child);
            for axis in Axis::BOTH {
                if p.scroll.bar(axis) == Some(child) {
                    p.scroll.set_bar(axis, None);
                }
            }
        }
        let subtree = self.subtree(child);
        for id in &subtree {
            if let Some(n) = self.nodes.get_mut(*id) {
                n.state = None;
                n.viewable = None;
            }
        }
        if let Some(n) = self.nodes.get_mut(child) {
            n.parent = None;
        }
        self.paint.retain(|id| !subtree.contains(id));

        if let Some(state) = state {
            let mut s = state.borrow_mut();
            s.forget(&subtree);
            s.invalidate(LayoutActions::TREE | LayoutActions::GEOMETRY);
        }
        trace!(?child, ?parent, "remove");
        Ok(())
    }

    /// Detach the child at an index. Returns the removed id.
    pub fn remove_at(&mut self, parent: NodeId, index: usize) -> Result<Option<NodeId>> {
        let Some(child) = self.get(parent)?.children.get(index).copied() else {
            return Ok(None);
        };
        self.remove(child)?;
        Ok(Some(child))
    }

    /// Detach every child matching a predicate. Returns the removed ids.
    pub fn remove_by(
        &mut self,
        parent: NodeId,
        mut f: impl FnMut(&Node) -> bool,
    ) -> Result<Vec<NodeId>> {
        let matching: Vec<NodeId> = self
            .get(parent)?
            .children
            .iter()
            .copied()
            .filter(|id| self.nodes.get(*id).is_some_and(&mut f))
            .collect();
        for id in &matching {
            self.remove(*id)?;
        }
        Ok(matching)
    }

    /// Detach every child with the given name.
    pub fn remove_named(&mut self, parent: NodeId, name: &str) -> Result<Vec<NodeId>> {
        self.remove_by(parent, |n| n.name == name)
    }

    /// Detach a node and free it and its descendants.
    pub fn destroy(&mut self, node: NodeId) -> Result<()> {
        self.remove(node)?;
        for id in self.subtree(node) {
            self.nodes.remove(id);
        }
        Ok(())
    }

    /// A subtree in pre-order, including its root.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Breadth-first search from `start`, inclusive.
    pub fn find_one_by(&self, start: NodeId, mut f: impl FnMut(&Node) -> bool) -> Option<NodeId> {
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if f(node) {
                return Some(id);
            }
            queue.extend(node.children.iter().copied());
        }
        None
    }

    /// Breadth-first search by name.
    pub fn find_named(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.find_one_by(start, |n| n.name == name)
    }

    /// Replace a node's layout.
    pub fn set_layout(&mut self, id: NodeId, layout: LayoutSpec) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.layout != layout {
            node.layout = layout;
            self.geometry_changed(id);
        }
        Ok(())
    }

    /// Edit a node's layout in place.
    pub fn with_layout(&mut self, id: NodeId, f: impl FnOnce(&mut LayoutSpec)) -> Result<()> {
        let mut layout = self.get(id)?.layout.clone();
        f(&mut layout);
        self.set_layout(id, layout)
    }

    /// Show or hide a node and its subtree.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.hidden != hidden {
            node.hidden = hidden;
            self.tree_changed(id);
        }
        Ok(())
    }

    /// Opt a node in or out of hit-testing.
    pub fn set_hit_target(&mut self, id: NodeId, hit_target: bool) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.hit_target != hit_target {
            node.hit_target = hit_target;
            self.paint_changed(id);
        }
        Ok(())
    }

    /// Edit a node's kind payload.
    pub fn with_kind<R>(&mut self, id: NodeId, f: impl FnOnce(&mut NodeKind) -> R) -> Result<R> {
        let r = f(&mut self.get_mut(id)?.kind);
        self.geometry_changed(id);
        Ok(r)
    }

    /// Set a scroll offset. It is clamped to the overflow on the next layout.
    pub fn set_scroll_offset(&mut self, id: NodeId, offset: Point) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.scroll.offset != offset {
            node.scroll.offset = offset;
            self.geometry_changed(id);
        }
        Ok(())
    }

    /// Set the GPU resource a node draws with.
    pub fn set_resource(&mut self, id: NodeId, resource: ResourceId) -> Result<()> {
        self.get_mut(id)?.resource = resource;
        self.paint_changed(id);
        Ok(())
    }

    /// Set the shader attribute callback.
    pub fn set_uniforms(&mut self, id: NodeId, f: UniformFn) -> Result<()> {
        self.get_mut(id)?.uniforms = Some(f);
        self.paint_changed(id);
        Ok(())
    }

    /// Register a listener for an event kind on a channel.
    pub fn listen(
        &mut self,
        id: NodeId,
        kind: EventKind,
        channel: Channel,
        listener: Listener,
    ) -> Result<()> {
        self.get_mut(id)?.listeners.add(kind, channel, listener);
        Ok(())
    }

    /// Invalidate through a node's window state, if it has one.
    fn invalidate(&self, id: NodeId, actions: LayoutActions) {
        if let Some(state) = self.nodes.get(id).and_then(|n| n.state.as_ref()) {
            state.borrow_mut().invalidate(actions);
        }
    }

    /// On-change hook for geometry-affecting state.
    pub(crate) fn geometry_changed(&self, id: NodeId) {
        self.invalidate(id, LayoutActions::GEOMETRY);
    }

    /// On-change hook for tree shape and visibility.
    pub(crate) fn tree_changed(&self, id: NodeId) {
        self.invalidate(id, LayoutActions::TREE | LayoutActions::GEOMETRY);
    }

    /// On-change hook for paint-only state.
    pub(crate) fn paint_changed(&self, id: NodeId) {
        if let Some(state) = self.nodes.get(id).and_then(|n| n.state.as_ref()) {
            state.borrow_mut().frame_requested = true;
        }
    }

    /// Walk the tree from the root breadth-first, handing every reachable
    /// node the window state, its parent link and its paint depth, then
    /// rebuild the paint list.
    pub fn resolve_tree(&mut self) {
        let mut paint = Vec::with_capacity(self.paint.len());
        let mut queue = VecDeque::from([(self.root, None, 0u32, true)]);
        while let Some((id, parent, depth, visible)) = queue.pop_front() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.state = Some(self.state.clone());
            node.parent = parent;
            node.depth = depth;
            let visible = visible && !node.hidden;
            if visible {
                paint.push(id);
            } else {
                node.viewable = None;
            }
            let children = node.children.clone();
            for child in children {
                if let Some(c) = self.nodes.get(child) {
                    let d = depth.saturating_add(1).saturating_add(c.kind.band());
                    queue.push_back((child, Some(id), d, visible));
                }
            }
        }
        paint.sort_by_key(|id| self.nodes.get(*id).map_or(0, |n| n.depth));
        trace!(nodes = paint.len(), "resolve tree");
        self.paint = paint;
        self.state.borrow_mut().clear(LayoutActions::TREE);
    }
}
