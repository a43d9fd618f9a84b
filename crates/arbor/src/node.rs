use std::fmt;

use crate::{
    NodeId,
    backend::UniformSink,
    event::ListenerTable,
    geom::{Axis, Point, Rect},
    invalidation::StateHandle,
    layout::LayoutSpec,
    solver::Overflow,
    state::NodeName,
    widgets::NodeKind,
};

/// GPU resource handle. Zero means "not loaded yet".
pub type ResourceId = u32;

/// Callback that writes a node's shader attributes.
pub type UniformFn = Box<dyn Fn(&mut dyn UniformSink)>;

/// Scroll offset plus the scrollbars attached to a container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Content offset, always within `[0, overflow]` per axis after layout.
    pub offset: Point,
    /// Attached horizontal scrollbar.
    pub horizontal: Option<NodeId>,
    /// Attached vertical scrollbar.
    pub vertical: Option<NodeId>,
}

impl ScrollState {
    /// The scrollbar for an axis.
    pub fn bar(&self, axis: Axis) -> Option<NodeId> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Replace the scrollbar for an axis.
    pub(crate) fn set_bar(&mut self, axis: Axis, bar: Option<NodeId>) {
        match axis {
            Axis::Horizontal => self.horizontal = bar,
            Axis::Vertical => self.vertical = bar,
        }
    }

    /// Is any scrollbar attached?
    pub fn has_bars(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }
}

/// Core node data stored in the scene arena.
pub struct Node {
    /// Creation order, unique within a scene.
    pub(crate) serial: u64,
    /// Node name for lookup and diagnostics.
    pub(crate) name: NodeName,
    /// Kind plus per-kind state.
    pub(crate) kind: NodeKind,
    /// Layout configuration.
    pub(crate) layout: LayoutSpec,

    /// Outer box in window coordinates.
    pub(crate) rect: Rect,
    /// Content box in window coordinates.
    pub(crate) content: Rect,
    /// Visible part of the box after clipping, if any.
    pub(crate) viewable: Option<Rect>,
    /// Overflow from the node's last successful layout.
    pub(crate) overflow: Overflow,
    /// Scroll offset and attached scrollbars.
    pub(crate) scroll: ScrollState,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree.
    pub(crate) children: Vec<NodeId>,
    /// Shared window state, present while attached to a window.
    pub(crate) state: Option<StateHandle>,
    /// Paint order.
    pub(crate) depth: u32,

    /// Hidden nodes and their subtrees are not laid out, painted or hit.
    pub(crate) hidden: bool,
    /// Whether the node receives pointer events.
    pub(crate) hit_target: bool,
    /// Set on virtualized rows outside the visible window.
    pub(crate) culled: bool,

    /// GPU resource to draw with.
    pub(crate) resource: ResourceId,
    /// Shader attribute callback.
    pub(crate) uniforms: Option<UniformFn>,
    /// Event listeners.
    pub(crate) listeners: ListenerTable,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("serial", &self.serial)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("rect", &self.rect)
            .field("viewable", &self.viewable)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("depth", &self.depth)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Construct a detached node.
    pub(crate) fn new(serial: u64, kind: NodeKind, name: NodeName) -> Self {
        let hit_target = kind.default_hit_target();
        Self {
            serial,
            name,
            kind,
            layout: LayoutSpec::default(),
            rect: Rect::zero(),
            content: Rect::zero(),
            viewable: None,
            overflow: Overflow::default(),
            scroll: ScrollState::default(),
            parent: None,
            children: Vec::new(),
            state: None,
            depth: 0,
            hidden: false,
            hit_target,
            culled: false,
            resource: 0,
            uniforms: None,
            listeners: ListenerTable::default(),
        }
    }

    /// Creation serial.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Node name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Kind and payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Layout configuration.
    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    /// Outer box in window coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Content box in window coordinates.
    pub fn content(&self) -> Rect {
        self.content
    }

    /// Clipped visible area, `None` when fully clipped or not painted.
    pub fn viewable(&self) -> Option<Rect> {
        self.viewable
    }

    /// Overflow from the last layout.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Scroll state.
    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    /// Parent id.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children, in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Paint-order depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Is the node hidden?
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Does the node receive pointer events?
    pub fn hit_target(&self) -> bool {
        self.hit_target
    }

    /// Is the node a virtualized row outside the visible window?
    pub fn culled(&self) -> bool {
        self.culled
    }

    /// GPU resource id.
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Is the node attached to a window?
    pub fn is_attached(&self) -> bool {
        self.state.is_some()
    }

    /// The shared window state, if attached.
    pub fn state(&self) -> Option<&StateHandle> {
        self.state.as_ref()
    }

    /// Listeners registered on this node.
    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }
}
