use super::backend::{RecordingRenderer, ScriptedBackend};
use crate::{
    NodeId,
    backend::InputSink,
    config::WindowConfig,
    error::Result,
    event::{Key, MouseButton},
    geom::{Point, Rect, Size},
    layout::LayoutSpec,
    scene::Scene,
    solver::update_viewables,
    widgets::NodeKind,
    window::{LayoutSummary, Window},
};

/// A window wired to a [`ScriptedBackend`] and a [`RecordingRenderer`].
/// Tests build a scene, drive input through the window and render a frame
/// after every input, then inspect geometry and draw calls.
pub struct Harness {
    /// The window under test.
    pub window: Window,
    /// Backend that records swaps and cursor changes.
    pub backend: ScriptedBackend,
    /// Renderer that records draw calls.
    pub renderer: RecordingRenderer,
}

impl Harness {
    /// A harness around a window of the given size.
    pub fn new(w: f32, h: f32) -> Result<Self> {
        Self::with_config(WindowConfig::default().with_size(w, h))
    }

    /// A harness around a configured window.
    pub fn with_config(config: WindowConfig) -> Result<Self> {
        Ok(Self {
            window: Window::new(config)?,
            backend: ScriptedBackend::default(),
            renderer: RecordingRenderer::default(),
        })
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        self.window.scene()
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.window.scene_mut()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.scene().root()
    }

    /// Create a node and append it to a parent.
    pub fn add(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: &str,
        layout: LayoutSpec,
    ) -> Result<NodeId> {
        let scene = self.scene_mut();
        let id = scene.create_with(kind, name, layout);
        scene.append(parent, id)?;
        Ok(id)
    }

    /// Settle layout and recompute visible areas without rendering.
    pub fn settle(&mut self) -> Result<LayoutSummary> {
        let summary = self.window.layout();
        update_viewables(self.window.scene_mut());
        Ok(summary)
    }

    /// Render one frame. Returns true if the window asked to close.
    pub fn frame(&mut self) -> Result<bool> {
        self.window.frame(&mut self.backend, &mut self.renderer)
    }

    /// A node's outer box.
    pub fn rect(&self, id: NodeId) -> Result<Rect> {
        Ok(self.scene().get(id)?.rect())
    }

    /// A node's visible area.
    pub fn viewable(&self, id: NodeId) -> Result<Option<Rect>> {
        Ok(self.scene().get(id)?.viewable())
    }

    /// Move the pointer and render.
    pub fn move_to(&mut self, pos: Point) -> Result<()> {
        self.window.pointer_moved(pos)?;
        self.frame()?;
        Ok(())
    }

    /// Press the left button at the current position and render.
    pub fn press(&mut self) -> Result<()> {
        self.window.pointer_button(MouseButton::Left, true)?;
        self.frame()?;
        Ok(())
    }

    /// Release the left button at the current position and render.
    pub fn release(&mut self) -> Result<()> {
        self.window.pointer_button(MouseButton::Left, false)?;
        self.frame()?;
        Ok(())
    }

    /// Move, press and release.
    pub fn click(&mut self, pos: Point) -> Result<()> {
        self.move_to(pos)?;
        self.press()?;
        self.release()
    }

    /// Press at `from`, move to `to` and release.
    pub fn drag(&mut self, from: Point, to: Point) -> Result<()> {
        self.move_to(from)?;
        self.press()?;
        self.move_to(to)?;
        self.release()
    }

    /// Scroll by wheel lines at the current position and render.
    pub fn scroll(&mut self, delta: Point) -> Result<()> {
        self.window.scrolled(delta)?;
        self.frame()?;
        Ok(())
    }

    /// Press a key and render. Returns true if the window asked to close.
    pub fn key(&mut self, key: Key) -> Result<bool> {
        self.window.key(key)?;
        self.frame()
    }

    /// Resize the window and render.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.window.resized(size)?;
        self.frame()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        backend::CursorShape,
        event::{Channel, Event, EventKind},
        widgets::button,
    };

    #[test]
    fn click_through_harness() -> Result<()> {
        let mut h = Harness::new(100.0, 100.0)?;
        let b = button::build(h.scene_mut(), "ok", LayoutSpec::fixed(20.0, 20.0));
        let root = h.root();
        h.scene_mut().append(root, b)?;
        h.scene_mut().set_resource(b, 4)?;
        h.frame()?;
        assert_eq!(h.renderer.drawn(), vec![b]);

        let clicks = Rc::new(RefCell::new(Vec::new()));
        let c = clicks.clone();
        h.scene_mut().listen(
            b,
            EventKind::Click,
            Channel::User,
            Box::new(move |_, _, e| c.borrow_mut().push(e.clone())),
        )?;
        h.click(Point::new(5.0, 5.0))?;
        assert_eq!(*clicks.borrow(), vec![Event::Click { source: b }]);
        assert_eq!(h.backend.cursors, vec![CursorShape::Hand]);
        Ok(())
    }
}
