//! Hit-testing and input routing. Raw input from the backend becomes typed
//! events delivered on the input channel of exactly one node.

use tracing::trace;

use crate::{
    NodeId,
    backend::CursorShape,
    error::Result,
    event::{Channel, Event, Key, MouseButton, dispatch},
    geom::{Axis, Point},
    scene::Scene,
    widgets::{NodeKind, scrollbar},
};

/// The topmost hit target under a point: the paint list is walked front to
/// back, skipping culled nodes and nodes whose visible area misses the point.
pub fn hit_test(scene: &Scene, pos: Point) -> Option<NodeId> {
    scene.paint_order().iter().rev().copied().find(|id| {
        scene.node(*id).is_some_and(|n| {
            n.hit_target() && !n.culled() && n.viewable().is_some_and(|v| v.contains_point(pos))
        })
    })
}

/// Cursor shape for a hovered node.
fn cursor_for(scene: &Scene, node: Option<NodeId>) -> CursorShape {
    let Some(n) = node.and_then(|id| scene.node(id)) else {
        return CursorShape::Arrow;
    };
    match n.kind() {
        NodeKind::Button => CursorShape::Hand,
        NodeKind::DividerSeparator => match n.parent().and_then(|p| scene.node(p)).map(|p| p.kind())
        {
            Some(NodeKind::Divider(d)) if d.axis == Axis::Vertical => CursorShape::ResizeVertical,
            _ => CursorShape::ResizeHorizontal,
        },
        _ => CursorShape::Arrow,
    }
}

/// Deliver an input event if the node still exists.
fn deliver(scene: &mut Scene, node: Option<NodeId>, event: &Event) -> Result<()> {
    match node {
        Some(id) if scene.contains(id) => dispatch(scene, id, event, Channel::Input),
        _ => Ok(()),
    }
}

/// The pointer moved. Fires leave and enter on hover changes, a move on the
/// hovered node and, with the left button held, a drag on the clicked node.
pub fn pointer_moved(scene: &mut Scene, pos: Point) -> Result<()> {
    let state = scene.state().clone();
    let (prev, held, clicked, old) = {
        let mut s = state.borrow_mut();
        s.prev_mouse = s.mouse;
        s.mouse = pos;
        (
            s.prev_mouse,
            s.is_pressed(MouseButton::Left),
            s.clicked,
            s.hovered,
        )
    };
    let hit = hit_test(scene, pos);
    if hit != old {
        trace!(?old, ?hit, "hover");
        state.borrow_mut().hovered = hit;
        deliver(scene, old, &Event::MouseLeave)?;
        deliver(scene, hit, &Event::MouseEnter)?;
        let cursor = cursor_for(scene, hit);
        state.borrow_mut().request_cursor(cursor);
    }
    deliver(scene, hit, &Event::MouseMove { pos })?;

    let delta = pos - prev;
    if held && !delta.is_zero() && let Some(origin) = clicked {
        deliver(scene, clicked, &Event::Drag { delta, origin })?;
    }
    Ok(())
}

/// A button changed state at the current pointer position.
pub fn pointer_button(scene: &mut Scene, button: MouseButton, pressed: bool) -> Result<()> {
    let state = scene.state().clone();
    let pos = {
        let mut s = state.borrow_mut();
        s.set_pressed(button, pressed);
        s.mouse
    };
    let hit = hit_test(scene, pos);
    if pressed {
        let previous = state.borrow().clicked;
        if hit != previous {
            {
                let mut s = state.borrow_mut();
                s.prev_clicked = previous;
                s.clicked = hit;
            }
            deliver(scene, previous, &Event::FocusLost)?;
        }
        deliver(scene, hit, &Event::MouseDown { button, pos })?;
    } else {
        deliver(scene, hit, &Event::MouseUp { button, pos })?;
        let clicked = state.borrow().clicked;
        if clicked.is_some() && clicked != hit {
            deliver(scene, clicked, &Event::MouseUpOutside { button, pos })?;
        }
    }
    Ok(())
}

/// Wheel input, in lines. The hit node sees the raw event; the nearest
/// scrollable ancestor with overflow on a scrolled axis moves by
/// `delta * step` pixels.
pub fn scrolled(scene: &mut Scene, delta: Point, step: f32) -> Result<()> {
    let pos = scene.state().borrow().mouse;
    let Some(hit) = hit_test(scene, pos) else {
        return Ok(());
    };
    dispatch(scene, hit, &Event::Scroll { delta }, Channel::Input)?;

    let mut current = Some(hit);
    while let Some(id) = current {
        let Some(n) = scene.node(id) else {
            break;
        };
        let mut pixels = Point::zero();
        for axis in Axis::BOTH {
            let d = delta.along(axis) * step;
            if d != 0.0 && n.layout().scrolls(axis) && n.overflow().along(axis) > 0.0 {
                pixels.set_along(axis, d);
            }
        }
        if !pixels.is_zero() {
            scrollbar::scroll_by(scene, id, pixels)?;
            break;
        }
        current = n.parent();
    }
    Ok(())
}

/// A key press goes to the clicked node. The quit key requests close.
pub fn key(scene: &mut Scene, key: Key, quit: Option<Key>) -> Result<()> {
    let clicked = scene.state().borrow().clicked;
    deliver(scene, clicked, &Event::Key(key))?;
    if quit == Some(key) {
        scene.state().borrow_mut().close_requested = true;
    }
    Ok(())
}
