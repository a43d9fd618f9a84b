use crate::{
    NodeId,
    error::Result,
    event::{Channel, Event, MouseButton, dispatch},
    layout::LayoutSpec,
    scene::Scene,
    widgets::NodeKind,
};

/// Create a detached button.
pub fn build(scene: &mut Scene, name: &str, layout: LayoutSpec) -> NodeId {
    scene.create_with(NodeKind::Button, name, layout)
}

/// A left release over the button that was also pressed emits `Click` to the
/// application, then to the parent on the internal channel so composites can
/// react to their own buttons.
pub(crate) fn on_input(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::MouseUp {
        button: MouseButton::Left,
        ..
    } = event
    else {
        return Ok(());
    };
    let clicked = scene.state().borrow().clicked;
    if clicked != Some(node) {
        return Ok(());
    }
    let click = Event::Click { source: node };
    dispatch(scene, node, &click, Channel::User)?;
    if let Some(parent) = scene.parent(node) {
        dispatch(scene, parent, &click, Channel::Internal)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{event::EventKind, geom::Point};

    fn release() -> Event {
        Event::MouseUp {
            button: MouseButton::Left,
            pos: Point::zero(),
        }
    }

    #[test]
    fn click_requires_press_on_self() -> Result<()> {
        let mut scene = Scene::default();
        let b = build(&mut scene, "ok", LayoutSpec::fixed(10.0, 10.0));
        scene.append(scene.root(), b)?;
        let clicks = Rc::new(RefCell::new(0));
        let c = clicks.clone();
        scene.listen(
            b,
            EventKind::Click,
            Channel::User,
            Box::new(move |_, _, _| *c.borrow_mut() += 1),
        )?;

        dispatch(&mut scene, b, &release(), Channel::Input)?;
        assert_eq!(*clicks.borrow(), 0);

        scene.state().borrow_mut().clicked = Some(b);
        dispatch(&mut scene, b, &release(), Channel::Input)?;
        assert_eq!(*clicks.borrow(), 1);
        Ok(())
    }

    #[test]
    fn click_reaches_parent_internally() -> Result<()> {
        let mut scene = Scene::default();
        let b = build(&mut scene, "ok", LayoutSpec::default());
        scene.append(scene.root(), b)?;
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        scene.listen(
            scene.root(),
            EventKind::Click,
            Channel::Internal,
            Box::new(move |_, _, e| *s.borrow_mut() = Some(e.clone())),
        )?;
        scene.state().borrow_mut().clicked = Some(b);
        dispatch(&mut scene, b, &release(), Channel::Input)?;
        assert_eq!(*seen.borrow(), Some(Event::Click { source: b }));
        Ok(())
    }
}
