//! Typed events and the per-node listener table.
//!
//! Listeners are keyed by ([`EventKind`], [`Channel`]). The input channel
//! carries events from the router, the internal channel carries events a
//! composite's own children synthesize for it, and the user channel is where
//! application code listens.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    NodeId,
    error::{Error, Result},
    geom::Point,
    scene::Scene,
    widgets,
};

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

impl MouseButton {
    /// Dense index for per-button tables.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter/return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key.
    F(u8),
}

/// Events delivered to nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The pointer entered the node.
    MouseEnter,
    /// The pointer left the node.
    MouseLeave,
    /// The pointer moved over the node.
    MouseMove {
        /// Pointer position.
        pos: Point,
    },
    /// A button was pressed over the node.
    MouseDown {
        /// Button pressed.
        button: MouseButton,
        /// Pointer position.
        pos: Point,
    },
    /// A button was released over the node.
    MouseUp {
        /// Button released.
        button: MouseButton,
        /// Pointer position.
        pos: Point,
    },
    /// A button was released while this clicked node was not under the
    /// pointer.
    MouseUpOutside {
        /// Button released.
        button: MouseButton,
        /// Pointer position.
        pos: Point,
    },
    /// Another node took the clicked identity.
    FocusLost,
    /// The pointer moved with the left button held after pressing this node.
    Drag {
        /// Pointer movement since the last drag event.
        delta: Point,
        /// The node the press landed on.
        origin: NodeId,
    },
    /// Wheel or trackpad scroll.
    Scroll {
        /// Scroll amount in lines. Positive values move content up or left.
        delta: Point,
    },
    /// A key press.
    Key(Key),
    /// A button was pressed and released over itself.
    Click {
        /// The button that was clicked.
        source: NodeId,
    },
    /// A slider value changed.
    ValueChanged(f32),
    /// A divider separator was dragged.
    DividerMoved {
        /// Separator index, counting from the leading edge.
        separator: usize,
        /// Requested pixel delta.
        delta: f32,
    },
    /// A scroll container's offset changed.
    Scrolled {
        /// New offset.
        offset: Point,
    },
    /// A dropdown or tree view opened (true) or closed (false).
    Toggled(bool),
    /// A dropdown option was selected.
    Selected(usize),
}

/// Fieldless event discriminant, used as a listener key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// See [`Event::MouseEnter`].
    MouseEnter,
    /// See [`Event::MouseLeave`].
    MouseLeave,
    /// See [`Event::MouseMove`].
    MouseMove,
    /// See [`Event::MouseDown`].
    MouseDown,
    /// See [`Event::MouseUp`].
    MouseUp,
    /// See [`Event::MouseUpOutside`].
    MouseUpOutside,
    /// See [`Event::FocusLost`].
    FocusLost,
    /// See [`Event::Drag`].
    Drag,
    /// See [`Event::Scroll`].
    Scroll,
    /// See [`Event::Key`].
    Key,
    /// See [`Event::Click`].
    Click,
    /// See [`Event::ValueChanged`].
    ValueChanged,
    /// See [`Event::DividerMoved`].
    DividerMoved,
    /// See [`Event::Scrolled`].
    Scrolled,
    /// See [`Event::Toggled`].
    Toggled,
    /// See [`Event::Selected`].
    Selected,
}

impl Event {
    /// The event's kind.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MouseEnter => EventKind::MouseEnter,
            Self::MouseLeave => EventKind::MouseLeave,
            Self::MouseMove { .. } => EventKind::MouseMove,
            Self::MouseDown { .. } => EventKind::MouseDown,
            Self::MouseUp { .. } => EventKind::MouseUp,
            Self::MouseUpOutside { .. } => EventKind::MouseUpOutside,
            Self::FocusLost => EventKind::FocusLost,
            Self::Drag { .. } => EventKind::Drag,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Key(_) => EventKind::Key,
            Self::Click { .. } => EventKind::Click,
            Self::ValueChanged(_) => EventKind::ValueChanged,
            Self::DividerMoved { .. } => EventKind::DividerMoved,
            Self::Scrolled { .. } => EventKind::Scrolled,
            Self::Toggled(_) => EventKind::Toggled,
            Self::Selected(_) => EventKind::Selected,
        }
    }
}

/// Event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    /// Events from the router.
    Input,
    /// Events forwarded by a composite's own children.
    Internal,
    /// Events for application code.
    User,
}

/// A registered listener.
pub type Listener = Box<dyn FnMut(&mut Scene, NodeId, &Event)>;

/// Listeners for one node, in registration order per key.
#[derive(Default)]
pub struct ListenerTable {
    /// Slots are `None` while their listener is running.
    entries: HashMap<(EventKind, Channel), Vec<Option<Listener>>>,
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTable")
            .field("keys", &self.entries.len())
            .finish()
    }
}

impl ListenerTable {
    /// Register a listener.
    pub fn add(&mut self, kind: EventKind, channel: Channel, listener: Listener) {
        self.entries
            .entry((kind, channel))
            .or_default()
            .push(Some(listener));
    }

    /// Number of listeners for a key.
    pub fn count(&self, kind: EventKind, channel: Channel) -> usize {
        self.entries.get(&(kind, channel)).map_or(0, Vec::len)
    }

    /// Total listeners across all keys.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Are there no listeners?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take a listener out of its slot for the duration of a call.
    fn take(&mut self, kind: EventKind, channel: Channel, index: usize) -> Option<Listener> {
        self.entries
            .get_mut(&(kind, channel))
            .and_then(|v| v.get_mut(index))
            .and_then(Option::take)
    }

    /// Return a listener to its slot.
    fn restore(&mut self, kind: EventKind, channel: Channel, index: usize, listener: Listener) {
        if let Some(slot) = self
            .entries
            .get_mut(&(kind, channel))
            .and_then(|v| v.get_mut(index))
            && slot.is_none()
        {
            *slot = Some(listener);
        }
    }
}

/// Deliver an event to a node on a channel: the node kind's built-in
/// behavior runs first, then registered listeners in registration order.
/// Events do not bubble.
pub fn dispatch(scene: &mut Scene, node: NodeId, event: &Event, channel: Channel) -> Result<()> {
    if !scene.contains(node) {
        return Err(Error::NodeNotFound(node));
    }
    trace!(?node, ?event, ?channel, "dispatch");
    widgets::behave(scene, node, event, channel)?;

    let kind = event.kind();
    let count = scene
        .node(node)
        .map_or(0, |n| n.listeners.count(kind, channel));
    for index in 0..count {
        let Some(mut listener) = scene
            .node_mut(node)
            .and_then(|n| n.listeners.take(kind, channel, index))
        else {
            continue;
        };
        listener(scene, node, event);
        // The node may have been destroyed by its own listener.
        if let Some(n) = scene.node_mut(node) {
            n.listeners.restore(kind, channel, index, listener);
        }
    }
    Ok(())
}
