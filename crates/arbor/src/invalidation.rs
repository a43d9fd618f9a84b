use std::{cell::RefCell, rc::Rc};

use bitflags::bitflags;

use crate::{
    NodeId,
    backend::CursorShape,
    event::MouseButton,
    geom::{Point, Size},
};

bitflags! {
    /// Recomputation owed before the next paint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutActions: u8 {
        /// Node boxes must be recomputed.
        const GEOMETRY = 1;
        /// Text geometry must be recomputed.
        const TEXT = 1 << 1;
        /// The tree shape changed and must be re-resolved.
        const TREE = 1 << 2;
    }
}

/// Shared handle to a window's invalidation state. Every node attached to the
/// window holds a clone; detached nodes hold none.
pub type StateHandle = Rc<RefCell<InvalidationState>>;

/// Per-window dirty flags plus transient input state.
#[derive(Debug, Default)]
pub struct InvalidationState {
    /// Current pointer position.
    pub mouse: Point,
    /// Pointer position before the last move.
    pub prev_mouse: Point,
    /// Pressed state for left, right and middle buttons.
    buttons: [bool; 3],
    /// Node that received the last press.
    pub clicked: Option<NodeId>,
    /// Node that was clicked before the current one.
    pub prev_clicked: Option<NodeId>,
    /// Node under the pointer.
    pub hovered: Option<NodeId>,
    /// Pending layout work.
    pub actions: LayoutActions,
    /// Window size in pixels.
    pub window_size: Size,
    /// Cursor shape requested by the router.
    pub cursor: CursorShape,
    /// Set when `cursor` changed since the driver last applied it.
    pub cursor_changed: bool,
    /// A frame should be rendered even if layout is clean.
    pub frame_requested: bool,
    /// The window should close.
    pub close_requested: bool,
}

impl InvalidationState {
    /// Create a shared state for a window of the given size. A fresh window
    /// owes a full layout.
    pub fn shared(window_size: Size) -> StateHandle {
        Rc::new(RefCell::new(Self {
            window_size,
            actions: LayoutActions::TREE | LayoutActions::GEOMETRY,
            frame_requested: true,
            ..Self::default()
        }))
    }

    /// Add pending layout actions and request a frame.
    pub fn invalidate(&mut self, actions: LayoutActions) {
        self.actions |= actions;
        self.frame_requested = true;
    }

    /// Is any of the given actions pending?
    pub fn owes(&self, actions: LayoutActions) -> bool {
        self.actions.intersects(actions)
    }

    /// Clear the given actions.
    pub fn clear(&mut self, actions: LayoutActions) {
        self.actions.remove(actions);
    }

    /// Record a cursor request, flagging a change only if the shape differs.
    pub fn request_cursor(&mut self, shape: CursorShape) {
        if self.cursor != shape {
            self.cursor = shape;
            self.cursor_changed = true;
        }
    }

    /// Take the pending cursor change, if any.
    pub fn take_cursor_change(&mut self) -> Option<CursorShape> {
        if self.cursor_changed {
            self.cursor_changed = false;
            Some(self.cursor)
        } else {
            None
        }
    }

    /// Is the button held?
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    /// Set a button's pressed state.
    pub fn set_pressed(&mut self, button: MouseButton, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    /// Forget any input references into the given nodes.
    pub fn forget(&mut self, gone: &[NodeId]) {
        for slot in [&mut self.clicked, &mut self.prev_clicked, &mut self.hovered] {
            if slot.is_some_and(|id| gone.contains(&id)) {
                *slot = None;
            }
        }
    }
}
