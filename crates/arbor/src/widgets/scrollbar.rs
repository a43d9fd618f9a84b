use tracing::debug;

use crate::{
    NodeId,
    error::Result,
    event::{Channel, Event, dispatch},
    geom::{Axis, Point},
    scene::Scene,
    widgets::NodeKind,
};

/// Scrollbar payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollbarState {
    /// The axis this bar scrolls.
    pub axis: Axis,
    /// Track length from the last layout.
    pub(crate) track: f32,
    /// Knob length from the last layout.
    pub(crate) knob: f32,
}

impl ScrollbarState {
    /// A bar for an axis.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Knob travel in pixels.
    pub fn travel(&self) -> f32 {
        (self.track - self.knob).max(0.0)
    }
}

/// Knob length and offset along a track. The knob covers the visible share
/// of the content and sits proportionally to the scroll offset.
pub fn knob_geometry(track: f32, view: f32, overflow: f32, offset: f32) -> (f32, f32) {
    if overflow <= 0.0 || view + overflow <= 0.0 {
        return (track, 0.0);
    }
    let len = track * view / (view + overflow);
    let pos = (offset / overflow).clamp(0.0, 1.0) * (track - len);
    (len, pos)
}

/// Clamp an offset into `[0, max(overflow, 0)]`.
pub fn clamp_offset(offset: f32, overflow: f32) -> f32 {
    offset.clamp(0.0, overflow.max(0.0))
}

/// Scroll a container by a pixel delta, clamped to its overflow. Emits
/// `Scrolled` and returns true if the offset moved.
pub fn scroll_by(scene: &mut Scene, container: NodeId, delta: Point) -> Result<bool> {
    let node = scene.get(container)?;
    let overflow = node.overflow();
    let current = node.scroll().offset;
    let next = Point::new(
        clamp_offset(current.x + delta.x, overflow.x),
        clamp_offset(current.y + delta.y, overflow.y),
    );
    if next == current {
        return Ok(false);
    }
    scene.set_scroll_offset(container, next)?;
    dispatch(
        scene,
        container,
        &Event::Scrolled { offset: next },
        Channel::User,
    )?;
    Ok(true)
}

/// Create a scrollbar with its knob and attach it to a container.
pub(crate) fn attach(scene: &mut Scene, container: NodeId, axis: Axis) -> Result<NodeId> {
    let bar = scene.create(NodeKind::Scrollbar(ScrollbarState::new(axis)), "scrollbar");
    let knob = scene.create(NodeKind::ScrollbarKnob, "knob");
    scene.append(bar, knob)?;
    scene.append(container, bar)?;
    scene.get_mut(container)?.scroll.set_bar(axis, Some(bar));
    debug!(?container, ?axis, "scrollbar attached");
    Ok(bar)
}

/// Destroy a container's scrollbar for an axis, if any.
pub(crate) fn detach(scene: &mut Scene, container: NodeId, axis: Axis) -> Result<()> {
    if let Some(bar) = scene.get(container)?.scroll().bar(axis) {
        scene.destroy(bar)?;
        debug!(?container, ?axis, "scrollbar detached");
    }
    Ok(())
}

/// Knob drags arrive here on the internal channel and become container
/// scrolls.
pub(crate) fn on_internal(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::Drag { delta, .. } = event else {
        return Ok(());
    };
    let Some(container) = scene.parent(node) else {
        return Ok(());
    };
    let Some(NodeKind::Scrollbar(state)) = scene.node(node).map(|n| n.kind()) else {
        return Ok(());
    };
    let (axis, travel) = (state.axis, state.travel());
    if travel <= 0.0 {
        return Ok(());
    }
    let overflow = scene.get(container)?.overflow().along(axis);
    let amount = delta.along(axis) * overflow.max(0.0) / travel;
    let mut step = Point::zero();
    step.set_along(axis, amount);
    scroll_by(scene, container, step)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        event::EventKind,
        layout::{LayoutSpec, Sizing},
        testing::Harness,
    };

    #[test]
    fn knob_without_overflow_fills_track() {
        assert_eq!(knob_geometry(100.0, 100.0, 0.0, 0.0), (100.0, 0.0));
        assert_eq!(knob_geometry(100.0, 100.0, -20.0, 5.0), (100.0, 0.0));
    }

    #[test]
    fn knob_is_proportional() {
        let (len, pos) = knob_geometry(100.0, 100.0, 100.0, 0.0);
        assert_eq!(len, 50.0);
        assert_eq!(pos, 0.0);
        let (_, pos) = knob_geometry(100.0, 100.0, 100.0, 100.0);
        assert_eq!(pos, 50.0);
        let (_, pos) = knob_geometry(100.0, 100.0, 100.0, 50.0);
        assert_eq!(pos, 25.0);
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_offset(-5.0, 10.0), 0.0);
        assert_eq!(clamp_offset(15.0, 10.0), 10.0);
        assert_eq!(clamp_offset(15.0, -10.0), 0.0);
    }

    #[test]
    fn attach_and_detach() -> Result<()> {
        let mut scene = Scene::default();
        let c = scene.create(NodeKind::Box, "c");
        scene.append(scene.root(), c)?;
        let bar = attach(&mut scene, c, Axis::Vertical)?;
        assert_eq!(scene.get(c)?.scroll().vertical, Some(bar));
        assert_eq!(scene.children(bar).len(), 1);
        detach(&mut scene, c, Axis::Vertical)?;
        assert_eq!(scene.get(c)?.scroll().vertical, None);
        assert!(!scene.contains(bar));
        Ok(())
    }

    #[test]
    fn knob_drag_scrolls_container() -> Result<()> {
        let mut h = Harness::new(200.0, 200.0)?;
        let root = h.root();
        let c = h.add(
            root,
            NodeKind::Box,
            "pane",
            LayoutSpec::column()
                .width(Sizing::Pixel(100.0))
                .height(Sizing::Pixel(100.0))
                .scroll(false, true),
        )?;
        let tall = h.add(c, NodeKind::Box, "tall", LayoutSpec::fixed(50.0, 300.0))?;
        let offsets = Rc::new(RefCell::new(Vec::new()));
        let o = offsets.clone();
        h.scene_mut().listen(
            c,
            EventKind::Scrolled,
            Channel::User,
            Box::new(move |_, _, e| {
                if let Event::Scrolled { offset } = e {
                    o.borrow_mut().push(*offset);
                }
            }),
        )?;
        h.frame()?;
        let bar = h.scene().get(c)?.scroll().vertical;
        assert!(bar.is_some());

        // The knob covers a third of a 100 pixel track, leaving 200 pixels
        // of overflow over 66.7 pixels of travel.
        h.drag(Point::new(95.0, 10.0), Point::new(95.0, 20.0))?;
        let offset = h.scene().get(c)?.scroll().offset;
        assert!((offset.y - 30.0).abs() < 1e-3, "{offset:?}");
        assert_eq!(offset.x, 0.0);
        assert_eq!(offsets.borrow().len(), 1);
        assert!((h.rect(tall)?.tl.y + 30.0).abs() < 1e-3);

        // Dragging far past the end stops at the overflow.
        h.drag(Point::new(95.0, 30.0), Point::new(95.0, 400.0))?;
        assert_eq!(h.scene().get(c)?.scroll().offset.y, 200.0);
        Ok(())
    }
}
