//! Scrollbar attachment driven by overflow.

use tracing::debug;

use crate::{NodeId, error::Result, geom::Axis, scene::Scene, widgets::scrollbar};

/// A scrollbar to attach or detach between layout passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollToggle {
    /// The scroll container.
    pub node: NodeId,
    /// The axis the bar scrolls.
    pub axis: Axis,
    /// Attach if true, detach otherwise.
    pub attach: bool,
}

/// Apply queued toggles. Attaching or detaching changes the tree, so the
/// next pass resolves it again.
pub fn apply_toggles(scene: &mut Scene, toggles: &[ScrollToggle]) -> Result<()> {
    for t in toggles {
        if !scene.contains(t.node) {
            continue;
        }
        let present = scene.get(t.node)?.scroll().bar(t.axis).is_some();
        match (t.attach, present) {
            (true, false) => {
                scrollbar::attach(scene, t.node, t.axis)?;
            }
            (false, true) => scrollbar::detach(scene, t.node, t.axis)?,
            _ => debug!(node = ?t.node, axis = ?t.axis, "stale scroll toggle"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::{Point, Rect, Size},
        invalidation::InvalidationState,
        layout::{LayoutSpec, Sizing},
        solver::{layout_pass, update_viewables},
        widgets::NodeKind,
    };

    fn settle(s: &mut Scene) -> Result<usize> {
        for i in 1..=8 {
            s.resolve_tree();
            let report = layout_pass(s);
            if report.toggles.is_empty() {
                update_viewables(s);
                return Ok(i);
            }
            apply_toggles(s, &report.toggles)?;
        }
        Ok(usize::MAX)
    }

    #[test]
    fn overflow_attaches_and_places_bar() -> Result<()> {
        let mut s = Scene::new(InvalidationState::shared(Size::new(200.0, 100.0)));
        let c = s.create_with(
            NodeKind::Box,
            "c",
            LayoutSpec::column()
                .width(Sizing::Pixel(100.0))
                .height(Sizing::Pixel(100.0))
                .scroll(false, true),
        );
        let tall = s.create_with(NodeKind::Box, "tall", LayoutSpec::fixed(50.0, 200.0));
        s.append(s.root(), c)?;
        s.append(c, tall)?;
        assert_eq!(settle(&mut s)?, 2);

        let bar = s.get(c)?.scroll().vertical;
        assert!(bar.is_some());
        if let Some(bar) = bar {
            assert_eq!(s.get(bar)?.rect(), Rect::new(90.0, 0.0, 10.0, 100.0));
            let knob = s.children(bar)[0];
            assert_eq!(s.get(knob)?.rect(), Rect::new(90.0, 0.0, 10.0, 50.0));
            assert!(s.get(bar)?.viewable().is_some());
        }
        assert_eq!(s.get(c)?.content().w, 90.0);

        s.set_scroll_offset(c, Point::new(0.0, 100.0))?;
        settle(&mut s)?;
        if let Some(bar) = bar {
            let knob = s.children(bar)[0];
            assert_eq!(s.get(knob)?.rect().tl.y, 50.0);
        }
        Ok(())
    }

    #[test]
    fn shrinking_content_detaches_bar() -> Result<()> {
        let mut s = Scene::new(InvalidationState::shared(Size::new(200.0, 100.0)));
        let c = s.create_with(
            NodeKind::Box,
            "c",
            LayoutSpec::column()
                .width(Sizing::Pixel(100.0))
                .height(Sizing::Pixel(100.0))
                .scroll(false, true),
        );
        let tall = s.create_with(NodeKind::Box, "tall", LayoutSpec::fixed(50.0, 200.0));
        s.append(s.root(), c)?;
        s.append(c, tall)?;
        settle(&mut s)?;
        let bar = s.get(c)?.scroll().vertical;

        s.with_layout(tall, |l| l.height = Sizing::Pixel(20.0))?;
        settle(&mut s)?;
        assert_eq!(s.get(c)?.scroll().vertical, None);
        assert!(bar.is_some_and(|b| !s.contains(b)));
        assert_eq!(s.get(c)?.content().w, 100.0);
        Ok(())
    }

    #[test]
    fn stale_toggles_are_ignored() -> Result<()> {
        let mut s = Scene::default();
        let c = s.create(NodeKind::Box, "c");
        s.append(s.root(), c)?;
        apply_toggles(
            &mut s,
            &[ScrollToggle {
                node: c,
                axis: Axis::Horizontal,
                attach: false,
            }],
        )?;
        assert!(!s.get(c)?.scroll().has_bars());
        Ok(())
    }
}
