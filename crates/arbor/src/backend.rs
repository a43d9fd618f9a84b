//! Contracts for the rendering and windowing backends.
//!
//! The core never talks to a GPU or a platform window directly. A renderer
//! receives one [`RenderItem`] per painted node, back to front; a window
//! backend delivers input through an [`InputSink`].

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    NodeId,
    error::Result,
    event::{Key, MouseButton},
    geom::{Corners, Point, Rect, Size},
    node::{ResourceId, UniformFn},
    widgets::NodeTag,
};

/// Pointer cursor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// The default arrow.
    #[default]
    Arrow,
    /// A pointing hand, over clickable nodes.
    Hand,
    /// Left-right resize.
    ResizeHorizontal,
    /// Up-down resize.
    ResizeVertical,
}

/// A shader attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// A scalar.
    Float(f32),
    /// Two components.
    Vec2([f32; 2]),
    /// Four components, usually a color or a rect.
    Vec4([f32; 4]),
    /// An integer.
    Int(i32),
}

/// Receives shader attributes from a node's uniform callback.
pub trait UniformSink {
    /// Set a named attribute.
    fn set(&mut self, name: &str, value: UniformValue);
}

/// The render contract for one node.
pub struct RenderItem<'a> {
    /// Node being drawn.
    pub id: NodeId,
    /// Node kind.
    pub tag: NodeTag,
    /// Outer box in window coordinates.
    pub rect: Rect,
    /// Clip rectangle.
    pub clip: Rect,
    /// Paint-order depth.
    pub depth: u32,
    /// GPU resource to draw with, never zero.
    pub resource: ResourceId,
    /// Corner radii.
    pub radius: Corners,
    /// Attribute callback.
    pub(crate) uniforms: Option<&'a UniformFn>,
}

impl fmt::Debug for RenderItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderItem")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("rect", &self.rect)
            .field("clip", &self.clip)
            .field("depth", &self.depth)
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl RenderItem<'_> {
    /// Write the node's shader attributes.
    pub fn apply_uniforms(&self, sink: &mut dyn UniformSink) {
        if let Some(f) = self.uniforms {
            f(sink);
        }
    }
}

/// A rendering backend.
pub trait Renderer {
    /// Start a frame.
    fn begin_frame(&mut self, window: Size) -> Result<()>;
    /// Bind the node's geometry, set its attributes and draw.
    fn draw(&mut self, item: &RenderItem<'_>) -> Result<()>;
    /// Finish the frame.
    fn end_frame(&mut self) -> Result<()>;
}

/// Wakes a backend that is blocked waiting for input. Safe to call from any
/// thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Raw input callbacks. Implemented by the window.
pub trait InputSink {
    /// The pointer moved to a window position.
    fn pointer_moved(&mut self, pos: Point) -> Result<()>;
    /// A button changed state.
    fn pointer_button(&mut self, button: MouseButton, pressed: bool) -> Result<()>;
    /// A key was pressed.
    fn key(&mut self, key: Key) -> Result<()>;
    /// The window was resized.
    fn resized(&mut self, size: Size) -> Result<()>;
    /// Wheel or trackpad scroll, in lines.
    fn scrolled(&mut self, delta: Point) -> Result<()>;
}

/// A windowing and input backend.
pub trait WindowBackend {
    /// Deliver pending input without blocking.
    fn poll_events(&mut self, sink: &mut dyn InputSink) -> Result<()>;
    /// Block until at least one input arrives or the waker fires, then
    /// deliver it.
    fn wait_events(&mut self, sink: &mut dyn InputSink) -> Result<()>;
    /// Change the pointer cursor.
    fn set_cursor(&mut self, shape: CursorShape) -> Result<()>;
    /// Present the rendered frame.
    fn swap_buffers(&mut self) -> Result<()>;
    /// Did the platform ask the window to close?
    fn close_requested(&self) -> bool;
    /// A waker that interrupts `wait_events`.
    fn waker(&self) -> Waker;
}
