use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    NodeId,
    backend::{
        CursorShape, InputSink, RenderItem, Renderer, UniformSink, UniformValue, Waker,
        WindowBackend,
    },
    error::Result,
    event::{Key, MouseButton},
    geom::{Point, Rect, Size},
    node::ResourceId,
};

/// One scripted input.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedInput {
    /// Pointer move.
    Move(Point),
    /// Button press or release.
    Button(MouseButton, bool),
    /// Key press.
    Key(Key),
    /// Window resize.
    Resize(Size),
    /// Wheel scroll in lines.
    Scroll(Point),
}

/// A window backend that replays a script of inputs. When the script runs
/// out, a blocking wait reports a close request instead of blocking.
#[derive(Default)]
pub struct ScriptedBackend {
    /// Inputs not yet delivered.
    pub script: VecDeque<ScriptedInput>,
    /// Cursor changes, in order.
    pub cursors: Vec<CursorShape>,
    /// Buffer swaps.
    pub swaps: usize,
    /// Set once a wait found the script empty.
    pub exhausted: bool,
    /// Times the waker fired.
    wakes: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    /// A backend with a script.
    pub fn new(script: impl IntoIterator<Item = ScriptedInput>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue a key press.
    pub fn push_key(&mut self, key: Key) {
        self.script.push_back(ScriptedInput::Key(key));
    }

    /// Queue a left click at a position.
    pub fn push_click(&mut self, pos: Point) {
        self.script.extend([
            ScriptedInput::Move(pos),
            ScriptedInput::Button(MouseButton::Left, true),
            ScriptedInput::Button(MouseButton::Left, false),
        ]);
    }

    /// Times the waker fired.
    pub fn wakes(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }

    /// Deliver one input.
    fn deliver(input: ScriptedInput, sink: &mut dyn InputSink) -> Result<()> {
        match input {
            ScriptedInput::Move(p) => sink.pointer_moved(p),
            ScriptedInput::Button(b, pressed) => sink.pointer_button(b, pressed),
            ScriptedInput::Key(k) => sink.key(k),
            ScriptedInput::Resize(s) => sink.resized(s),
            ScriptedInput::Scroll(d) => sink.scrolled(d),
        }
    }
}

impl WindowBackend for ScriptedBackend {
    fn poll_events(&mut self, sink: &mut dyn InputSink) -> Result<()> {
        while let Some(input) = self.script.pop_front() {
            Self::deliver(input, sink)?;
        }
        Ok(())
    }

    fn wait_events(&mut self, sink: &mut dyn InputSink) -> Result<()> {
        match self.script.pop_front() {
            Some(input) => Self::deliver(input, sink),
            None => {
                self.exhausted = true;
                Ok(())
            }
        }
    }

    fn set_cursor(&mut self, shape: CursorShape) -> Result<()> {
        self.cursors.push(shape);
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.swaps += 1;
        Ok(())
    }

    fn close_requested(&self) -> bool {
        self.exhausted
    }

    fn waker(&self) -> Waker {
        let wakes = self.wakes.clone();
        Arc::new(move || {
            wakes.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// A draw call as seen by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Node drawn.
    pub id: NodeId,
    /// Outer box.
    pub rect: Rect,
    /// Clip rect.
    pub clip: Rect,
    /// Paint depth.
    pub depth: u32,
    /// Resource bound.
    pub resource: ResourceId,
    /// Attributes written by the node's uniform callback.
    pub uniforms: HashMap<String, UniformValue>,
}

impl UniformSink for HashMap<String, UniformValue> {
    fn set(&mut self, name: &str, value: UniformValue) {
        self.insert(name.to_string(), value);
    }
}

/// A renderer that records the draw calls of the most recent frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Frames begun.
    pub frames: usize,
    /// Window size of the last frame.
    pub size: Size,
    /// Draw calls of the last frame, back to front.
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    /// Ids drawn in the last frame, back to front.
    pub fn drawn(&self) -> Vec<NodeId> {
        self.calls.iter().map(|c| c.id).collect()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, window: Size) -> Result<()> {
        self.frames += 1;
        self.size = window;
        self.calls.clear();
        Ok(())
    }

    fn draw(&mut self, item: &RenderItem<'_>) -> Result<()> {
        let mut uniforms = HashMap::new();
        item.apply_uniforms(&mut uniforms);
        self.calls.push(DrawCall {
            id: item.id,
            rect: item.rect,
            clip: item.clip,
            depth: item.depth,
            resource: item.resource,
            uniforms,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}
