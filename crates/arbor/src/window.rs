//! The per-window driver: input in, frames out.

use std::mem;

use scopeguard::guard;
use tracing::{debug, debug_span, trace, warn};

use crate::{
    NodeId,
    backend::{InputSink, RenderItem, Renderer, WindowBackend},
    config::WindowConfig,
    error::{Error, Result},
    event::{Key, MouseButton},
    geom::{Point, Size},
    invalidation::{InvalidationState, LayoutActions, StateHandle},
    router,
    scene::Scene,
    solver::{apply_toggles, layout_pass, update_viewables},
    tasks::TaskQueue,
};

/// Layout work that triggers the layout loop.
const LAYOUT_DIRTY: LayoutActions = LayoutActions::TREE
    .union(LayoutActions::GEOMETRY)
    .union(LayoutActions::TEXT);

/// Outcome of the bounded layout loop.
#[derive(Debug, Default)]
pub struct LayoutSummary {
    /// Passes run.
    pub passes: usize,
    /// Did layout come clean within the pass cap?
    pub settled: bool,
    /// Node failures from the last pass.
    pub errors: Vec<(NodeId, Error)>,
}

/// A window: one scene, its shared state, its configuration and its task
/// queue.
pub struct Window {
    /// The node tree.
    scene: Scene,
    /// Settings.
    config: WindowConfig,
    /// Work queued for this window's thread.
    tasks: TaskQueue,
}

impl Window {
    /// Create a window with an empty root.
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        let state = InvalidationState::shared(config.size());
        debug!(title = %config.title, w = config.width, h = config.height, "window created");
        Ok(Self {
            scene: Scene::new(state),
            config,
            tasks: TaskQueue::new(),
        })
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Shared window state.
    pub fn state(&self) -> StateHandle {
        self.scene.state().clone()
    }

    /// Settings.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// The task queue. Clone it to hand to other threads.
    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// Is there work that should not wait for input?
    fn has_pending_work(&self) -> Result<bool> {
        let dirty = {
            let s = self.scene.state().borrow();
            s.owes(LAYOUT_DIRTY) || s.frame_requested || s.cursor_changed
        };
        Ok(dirty || self.tasks.pending()? > 0)
    }

    /// Run layout until nothing is dirty or the pass cap is reached. Each
    /// pass clears GEOMETRY first, so anything that dirties it during the
    /// pass, such as a scrollbar toggle, causes another pass.
    pub fn layout(&mut self) -> LayoutSummary {
        let state = self.scene.state().clone();
        let mut summary = LayoutSummary::default();
        let cap = self.config.max_layout_passes;
        while state.borrow().owes(LAYOUT_DIRTY) {
            if summary.passes >= cap {
                let e = Error::LayoutDidNotSettle(cap);
                warn!("{e}");
                // Keep the paint list consistent with the tree we render.
                if state.borrow().owes(LayoutActions::TREE) {
                    self.scene.resolve_tree();
                }
                state.borrow_mut().clear(LAYOUT_DIRTY);
                return summary;
            }
            let tree = {
                let mut s = state.borrow_mut();
                s.clear(LayoutActions::GEOMETRY | LayoutActions::TEXT);
                s.owes(LayoutActions::TREE)
            };
            if tree {
                self.scene.resolve_tree();
            }
            let report = layout_pass(&mut self.scene);
            summary.passes += 1;
            summary.errors = report.errors;
            if let Err(e) = apply_toggles(&mut self.scene, &report.toggles) {
                warn!("scrollbar toggle failed: {e}");
            }
        }
        summary.settled = true;
        summary
    }

    /// Draw every painted node with a visible area and a loaded resource.
    /// Returns the number of nodes drawn.
    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<usize> {
        let size = self.scene.state().borrow().window_size;
        renderer.begin_frame(size)?;
        let mut drawn = 0;
        for id in self.scene.paint_order() {
            let Some(n) = self.scene.node(*id) else {
                continue;
            };
            let Some(clip) = n.viewable() else {
                continue;
            };
            if n.culled() {
                continue;
            }
            if n.resource() == 0 {
                trace!(node = ?id, "resource not ready");
                continue;
            }
            renderer.draw(&RenderItem {
                id: *id,
                tag: n.kind().tag(),
                rect: n.rect(),
                clip,
                depth: n.depth(),
                resource: n.resource(),
                radius: n.layout().radius,
                uniforms: n.uniforms.as_ref(),
            })?;
            drawn += 1;
        }
        renderer.end_frame()?;
        Ok(drawn)
    }

    /// Produce one frame: drain tasks, apply cursor changes, settle layout,
    /// recompute visible areas and render if anything changed. Returns true
    /// if the window should close.
    pub fn frame(
        &mut self,
        backend: &mut dyn WindowBackend,
        renderer: &mut dyn Renderer,
    ) -> Result<bool> {
        let _span = debug_span!("frame").entered();
        let tasks = self.tasks.drain()?;
        let state = self.scene.state().clone();

        let cursor = state.borrow_mut().take_cursor_change();
        if let Some(shape) = cursor {
            backend.set_cursor(shape)?;
        }

        let dirty = state.borrow().owes(LAYOUT_DIRTY);
        let summary = dirty.then(|| self.layout());
        update_viewables(&mut self.scene);

        let requested = mem::take(&mut state.borrow_mut().frame_requested);
        let mut drawn = 0;
        if dirty || requested {
            drawn = self.render(renderer)?;
            backend.swap_buffers()?;
        }
        if let Some(s) = &summary {
            debug!(
                tasks,
                passes = s.passes,
                settled = s.settled,
                errors = s.errors.len(),
                drawn,
                "frame"
            );
        }
        let close = state.borrow().close_requested || backend.close_requested();
        Ok(close)
    }

    /// Run frames until the window closes, polling input while work is
    /// pending and blocking for it otherwise.
    pub fn run(
        &mut self,
        backend: &mut dyn WindowBackend,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        self.tasks.set_waker(backend.waker())?;
        // The waker belongs to the backend, which may not outlive this call.
        let _waker = guard(self.tasks.clone(), |tasks| {
            if tasks.take_waker().is_err() {
                warn!("task waker lock poisoned");
            }
        });
        loop {
            if self.frame(backend, renderer)? {
                debug!("window closing");
                return Ok(());
            }
            if self.has_pending_work()? {
                backend.poll_events(self)?;
            } else {
                backend.wait_events(self)?;
            }
        }
    }
}

impl InputSink for Window {
    fn pointer_moved(&mut self, pos: Point) -> Result<()> {
        router::pointer_moved(&mut self.scene, pos)
    }

    fn pointer_button(&mut self, button: MouseButton, pressed: bool) -> Result<()> {
        router::pointer_button(&mut self.scene, button, pressed)
    }

    fn key(&mut self, key: Key) -> Result<()> {
        router::key(&mut self.scene, key, self.config.quit_key)
    }

    fn resized(&mut self, size: Size) -> Result<()> {
        let size = Size::checked(size.w, size.h)?;
        let mut s = self.scene.state().borrow_mut();
        if s.window_size != size {
            s.window_size = size;
            s.invalidate(LayoutActions::GEOMETRY);
        }
        Ok(())
    }

    fn scrolled(&mut self, delta: Point) -> Result<()> {
        router::scrolled(&mut self.scene, delta, self.config.scroll_step)
    }
}
