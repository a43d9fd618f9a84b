//! Property and randomized tests over whole scenes.

#[cfg(test)]
mod tests {
    use arbor::{
        Edges, Flow, LayoutSpec, NodeId, NodeKind, Point, Rect, Result, Scene, Size, Sizing, Window,
        WindowConfig,
        invalidation::InvalidationState,
        router::hit_test,
        solver::{layout_pass, update_viewables},
    };
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn scene(w: f32, h: f32) -> Scene {
        Scene::new(InvalidationState::shared(Size::new(w, h)))
    }

    fn settle(s: &mut Scene) {
        s.resolve_tree();
        layout_pass(s);
        update_viewables(s);
    }

    proptest! {
        #[test]
        fn unit_fraction_fills_content(
            w in 1.0f32..800.0,
            h in 1.0f32..800.0,
            pad in 0.0f32..20.0,
            vertical in any::<bool>(),
        ) {
            let mut s = scene(1000.0, 1000.0);
            let flow = if vertical { Flow::Vertical } else { Flow::Horizontal };
            let parent = s.create_with(
                NodeKind::Box,
                "parent",
                LayoutSpec::fixed(w, h).flow(flow).padding(Edges::all(pad)),
            );
            let child = s.create_with(
                NodeKind::Box,
                "child",
                LayoutSpec::default()
                    .width(Sizing::Fraction(1.0))
                    .height(Sizing::Fraction(1.0)),
            );
            s.append(s.root(), parent)?;
            s.append(parent, child)?;
            settle(&mut s);

            let content = s.node(parent).map(|n| n.content()).unwrap_or_default();
            let got = s.node(child).map(|n| n.rect()).unwrap_or_default();
            prop_assert_eq!(got.size(), content.size());
            prop_assert_eq!(got.tl, content.tl);
        }

        #[test]
        fn wrapped_children_start_inside_the_line(
            width in 20.0f32..400.0,
            gap in 0.0f32..8.0,
            widths in prop::collection::vec(0.05f32..1.5, 1..24),
        ) {
            let mut s = scene(1000.0, 1000.0);
            let row = s.create_with(
                NodeKind::Box,
                "row",
                LayoutSpec::row()
                    .width(Sizing::Pixel(width))
                    .height(Sizing::Pixel(1000.0))
                    .wrap(true)
                    .gap(gap),
            );
            s.append(s.root(), row)?;
            let mut children = Vec::new();
            for f in &widths {
                let c = s.create_with(NodeKind::Box, "c", LayoutSpec::fixed(f * width, 10.0));
                s.append(row, c)?;
                children.push(c);
            }
            settle(&mut s);

            for c in children {
                let r = s.node(c).map(|n| n.rect()).unwrap_or_default();
                if r.w <= width {
                    prop_assert!(r.right() <= width + 1e-3, "{r:?} exceeds {width}");
                } else {
                    // Too wide for any line: it starts one of its own.
                    prop_assert_eq!(r.tl.x, 0.0);
                }
            }
        }
    }

    #[test]
    fn detaching_clears_state() -> Result<()> {
        let mut s = scene(100.0, 100.0);
        let a = s.create_with(NodeKind::Box, "a", LayoutSpec::fill());
        let b = s.create_with(NodeKind::Box, "b", LayoutSpec::fill());
        let c = s.create_with(NodeKind::Button, "c", LayoutSpec::fixed(5.0, 5.0));
        s.append(s.root(), a)?;
        s.append(a, b)?;
        s.append(b, c)?;
        settle(&mut s);
        for id in [a, b, c] {
            assert!(s.node(id).is_some_and(|n| n.state().is_some()));
        }

        s.remove(a)?;
        for id in [a, b, c] {
            let n = s.node(id);
            assert!(n.is_some_and(|n| n.state().is_none() && n.viewable().is_none()));
            assert!(!s.paint_order().contains(&id));
        }
        assert_eq!(s.node(a).and_then(|n| n.parent()), None);
        // Still in the arena, ready to be re-attached.
        s.append(s.root(), a)?;
        settle(&mut s);
        assert!(s.node(c).is_some_and(|n| n.state().is_some()));
        Ok(())
    }

    #[test]
    fn hits_respect_ancestor_clipping() -> Result<()> {
        let mut s = scene(200.0, 200.0);
        let clip = s.create_with(NodeKind::Box, "clip", LayoutSpec::fixed(50.0, 50.0));
        let first = s.create_with(NodeKind::Box, "first", LayoutSpec::fixed(40.0, 40.0));
        let second = s.create_with(NodeKind::Box, "second", LayoutSpec::fixed(40.0, 40.0));
        s.append(s.root(), clip)?;
        s.append(clip, first)?;
        s.append(clip, second)?;
        settle(&mut s);

        assert_eq!(hit_test(&s, Point::new(45.0, 10.0)), Some(second));
        // Inside `second`'s box but outside its parent.
        assert_eq!(hit_test(&s, Point::new(60.0, 10.0)), Some(s.root()));
        assert_eq!(hit_test(&s, Point::new(10.0, 10.0)), Some(first));
        Ok(())
    }

    fn within(outer: Rect, inner: Rect) -> bool {
        const EPS: f32 = 1e-3;
        inner.tl.x >= outer.tl.x - EPS
            && inner.tl.y >= outer.tl.y - EPS
            && inner.right() <= outer.right() + EPS
            && inner.bottom() <= outer.bottom() + EPS
    }

    fn random_layout(rng: &mut StdRng) -> LayoutSpec {
        let sizing = |rng: &mut StdRng| match rng.random_range(0..4) {
            0 => Sizing::Pixel(rng.random_range(0.0..120.0)),
            1 => Sizing::Fraction(rng.random_range(0.0..1.0)),
            2 => Sizing::Fit,
            _ => Sizing::Fill,
        };
        let flow = match rng.random_range(0..3) {
            0 => Flow::Horizontal,
            1 => Flow::Vertical,
            _ => Flow::Grid,
        };
        LayoutSpec::default()
            .width(sizing(rng))
            .height(sizing(rng))
            .flow(flow)
            .wrap(rng.random_bool(0.3))
            .padding(Edges::all(rng.random_range(0.0..4.0)))
            .gap(rng.random_range(0.0..4.0))
            .scroll(rng.random_bool(0.3), rng.random_bool(0.3))
    }

    fn build_random_tree(
        w: &mut Window,
        rng: &mut StdRng,
        parent: NodeId,
        depth: usize,
    ) -> Result<()> {
        let n = rng.random_range(0..4);
        for i in 0..n {
            let layout = random_layout(rng);
            let id = w
                .scene_mut()
                .create_with(NodeKind::Box, &format!("n_{depth}_{i}"), layout);
            w.scene_mut().append(parent, id)?;
            if depth > 0 {
                build_random_tree(w, rng, id, depth - 1)?;
            }
        }
        Ok(())
    }

    #[test]
    fn random_trees_settle_without_panicking() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let size = (rng.random_range(10.0..600.0), rng.random_range(10.0..600.0));
            let mut w = Window::new(WindowConfig::default().with_size(size.0, size.1))?;
            let root = w.scene().root();
            build_random_tree(&mut w, &mut rng, root, 3)?;
            w.layout();
            update_viewables(w.scene_mut());

            let s = w.scene();
            for id in s.paint_order() {
                let Some(n) = s.node(*id) else {
                    continue;
                };
                let r = n.rect();
                assert!(r.w >= 0.0 && r.h >= 0.0, "{} has negative size", n.name());
                assert!(r.tl.x.is_finite() && r.tl.y.is_finite());
                if let (Some(v), Some(p)) = (n.viewable(), n.parent().and_then(|p| s.node(p))) {
                    let parent_view = p.viewable().unwrap_or_default();
                    assert!(within(parent_view, v) || n.kind().is_overlay());
                }
            }
            for _ in 0..20 {
                let p = Point::new(rng.random_range(0.0..size.0), rng.random_range(0.0..size.1));
                let hit = hit_test(s, p);
                let view = hit.and_then(|h| s.node(h)).and_then(|n| n.viewable());
                assert!(view.is_some_and(|v| v.contains_point(p)));
            }
        }
        Ok(())
    }
}
