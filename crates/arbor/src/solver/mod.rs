//! The layout solver. Each node's own box is final by the time it is
//! processed; processing computes its direct children's boxes. Nodes are
//! processed in paint order, so parents always run before their children.

mod composite;
mod flow;
pub mod grid;
mod scroll;
mod sizing;

use std::{collections::HashSet, mem};

use serde::Serialize;
use tracing::{trace, warn};

pub use scroll::{ScrollToggle, apply_toggles};
pub use sizing::{fit_extent, measure};

use crate::{
    NodeId,
    error::{Error, Result},
    geom::{Axis, Point, Rect, Size},
    layout::Flow,
    scene::Scene,
    widgets::{
        NodeKind, NodeTag,
        dropdown::{self, place_popup},
        scrollbar::{clamp_offset, knob_geometry},
    },
};

/// Content extent beyond a node's content box per axis. Negative values are
/// leftover space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Overflow {
    /// Horizontal overflow.
    pub x: f32,
    /// Vertical overflow.
    pub y: f32,
}

impl Overflow {
    /// Construct an overflow.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Overflow along an axis.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Set the overflow along an axis.
    pub fn set_along(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }
}

/// Placements computed for one node, committed only if the node itself
/// succeeds. Children that cannot be sized are left out of `flow` and keep
/// their last geometry.
#[derive(Debug, Default)]
pub(crate) struct Arrangement {
    /// The node's content box.
    pub content: Rect,
    /// In-flow placements.
    pub flow: Vec<(NodeId, Rect)>,
    /// Out-of-flow placements: bars, knobs, popups and floating boxes.
    pub fixed: Vec<(NodeId, Rect)>,
    /// Overflow of the in-flow children.
    pub overflow: Overflow,
    /// Clamped scroll offset.
    pub offset: Point,
    /// Culling decisions.
    pub culled: Vec<(NodeId, bool)>,
    /// Updated payloads.
    pub kinds: Vec<(NodeId, NodeKind)>,
    /// Children left unplaced, with the reason.
    pub errors: Vec<(NodeId, Error)>,
}

/// Visible children placed by their parent's flow.
pub(crate) fn flow_children(scene: &Scene, node: NodeId) -> Vec<NodeId> {
    scene
        .children(node)
        .iter()
        .copied()
        .filter(|c| {
            scene
                .node(*c)
                .is_some_and(|n| !n.hidden() && n.kind().in_flow())
        })
        .collect()
}

/// Result of one layout pass.
#[derive(Debug, Default)]
pub struct LayoutReport {
    /// Nodes processed successfully.
    pub processed: usize,
    /// Nodes whose layout failed. A failed node keeps its last geometry; if
    /// the node itself could not arrange, so do all of its children.
    pub errors: Vec<(NodeId, Error)>,
    /// Scrollbars to attach or detach before the next pass.
    pub toggles: Vec<ScrollToggle>,
}

/// Lay out a node's direct children. Returns the node's overflow and the
/// children that could not be sized, which keep their last geometry while
/// their siblings are placed.
pub fn process(scene: &mut Scene, node: NodeId) -> Result<(Overflow, Vec<(NodeId, Error)>)> {
    let mut arr = arrange(scene, node)?;
    let overflow = arr.overflow;
    let errors = mem::take(&mut arr.errors);
    commit(scene, node, arr)?;
    Ok((overflow, errors))
}

/// Compute placements for a node's children without touching the scene.
fn arrange(scene: &Scene, node: NodeId) -> Result<Arrangement> {
    let n = scene.get(node)?;
    let spec = &n.layout;
    let mut content = n.rect.shrink(spec.insets());
    if n.scroll.vertical.is_some() {
        content.w = (content.w - spec.scrollbar_size).max(0.0);
    }
    if n.scroll.horizontal.is_some() {
        content.h = (content.h - spec.scrollbar_size).max(0.0);
    }

    let mut arr = Arrangement {
        content,
        ..Arrangement::default()
    };
    let children = flow_children(scene, node);
    match &n.kind {
        NodeKind::Divider(state) => {
            composite::divider(scene, node, state, content, &children, &mut arr)?
        }
        NodeKind::Slider(state) => {
            composite::slider(scene, node, state, content, &children, &mut arr)?
        }
        NodeKind::VirtualList(state) => composite::list(
            scene,
            node,
            state,
            content,
            n.scroll.offset.y,
            &children,
            &mut arr,
        )?,
        NodeKind::TreeView(state) => {
            flow::arrange(scene, spec, content, &children, &mut arr)?;
            composite::indent(scene.children(node).first().copied(), state, content, &mut arr);
        }
        // Knobs are placed by the scrolled container.
        NodeKind::Scrollbar(_) => {}
        _ if spec.flow == Flow::Grid => grid::arrange(scene, spec, content, &children, &mut arr)?,
        _ => flow::arrange(scene, spec, content, &children, &mut arr)?,
    }
    if !matches!(n.kind, NodeKind::VirtualList(_)) {
        arr.culled.extend(children.iter().map(|c| (*c, false)));
    }

    for axis in Axis::BOTH {
        if spec.scrolls(axis) {
            let clamped = clamp_offset(n.scroll.offset.along(axis), arr.overflow.along(axis));
            arr.offset.set_along(axis, clamped);
        }
    }
    if !arr.offset.is_zero() {
        let shift = Point::zero() - arr.offset;
        for (_, r) in &mut arr.flow {
            *r = r.translate(shift);
        }
    }

    place_bars(scene, node, &mut arr)?;
    place_floating(scene, node, &mut arr)?;
    if let NodeKind::Dropdown(state) = &n.kind
        && state.open
        && let Some(container) = dropdown::container(scene, node)
    {
        let size = Size::new(
            fit_extent(scene, container, Axis::Horizontal)?,
            fit_extent(scene, container, Axis::Vertical)?,
        );
        let window = scene.state().borrow().window_size.rect();
        let (direction, rect) = place_popup(n.rect, size, window, &state.directions);
        arr.fixed.push((container, rect));
        let mut next = state.clone();
        next.placed = Some(direction);
        arr.kinds.push((node, NodeKind::Dropdown(next)));
    }
    Ok(arr)
}

/// Place attached scrollbars along the content edges and size their knobs
/// from the overflow and clamped offset.
fn place_bars(scene: &Scene, node: NodeId, arr: &mut Arrangement) -> Result<()> {
    let n = scene.get(node)?;
    let thickness = n.layout.scrollbar_size;
    let content = arr.content;
    for axis in Axis::BOTH {
        let Some(bar) = n.scroll.bar(axis) else {
            continue;
        };
        let rect = match axis {
            Axis::Vertical => Rect::new(content.right(), content.tl.y, thickness, content.h),
            Axis::Horizontal => Rect::new(content.tl.x, content.bottom(), content.w, thickness),
        };
        arr.fixed.push((bar, rect));
        let track = rect.extent(axis);
        let (len, pos) = knob_geometry(
            track,
            content.extent(axis),
            arr.overflow.along(axis),
            arr.offset.along(axis),
        );
        if let Some(knob) = scene.children(bar).first() {
            let mut tl = rect.tl;
            tl.set_along(axis, tl.along(axis) + pos);
            arr.fixed
                .push((*knob, Rect::from_origin(tl, Size::from_main_cross(axis, len, thickness))));
        }
        if let NodeKind::Scrollbar(state) = scene.get(bar)?.kind() {
            let mut next = state.clone();
            next.track = track;
            next.knob = len;
            arr.kinds.push((bar, NodeKind::Scrollbar(next)));
        }
    }
    Ok(())
}

/// Floating boxes sit at the content origin plus their offset, sized as if
/// they were alone in the content box.
fn place_floating(scene: &Scene, node: NodeId, arr: &mut Arrangement) -> Result<()> {
    for child in scene.children(node) {
        let c = scene.get(*child)?;
        if c.hidden() || c.kind().tag() != NodeTag::FloatingBox {
            continue;
        }
        let size = measure(scene, *child, arr.content.size())?;
        let tl = arr.content.tl + c.layout().offset;
        arr.fixed.push((*child, Rect::from_origin(tl, size)));
    }
    Ok(())
}

/// Write an arrangement back to the scene.
fn commit(scene: &mut Scene, node: NodeId, arr: Arrangement) -> Result<()> {
    for (id, rect) in arr.flow.into_iter().chain(arr.fixed) {
        if let Some(n) = scene.node_mut(id) {
            n.rect = rect;
        }
    }
    for (id, culled) in arr.culled {
        if let Some(n) = scene.node_mut(id) {
            n.culled = culled;
        }
    }
    for (id, kind) in arr.kinds {
        if let Some(n) = scene.node_mut(id) {
            n.kind = kind;
        }
    }
    let n = scene.get_mut(node)?;
    n.content = arr.content;
    n.overflow = arr.overflow;
    n.scroll.offset = arr.offset;
    Ok(())
}

/// Scrollbar changes implied by a node's overflow.
fn toggles_for(scene: &Scene, node: NodeId, overflow: Overflow, out: &mut Vec<ScrollToggle>) {
    let Some(n) = scene.node(node) else {
        return;
    };
    for axis in Axis::BOTH {
        let want = n.layout.scrolls(axis) && overflow.along(axis) > 0.0;
        if want != n.scroll.bar(axis).is_some() {
            out.push(ScrollToggle {
                node,
                axis,
                attach: want,
            });
        }
    }
}

/// Run one pass over the paint list. The root takes the window rect. Failing
/// nodes are logged and reported; the pass continues.
pub fn layout_pass(scene: &mut Scene) -> LayoutReport {
    let window = scene.state().borrow().window_size;
    let root = scene.root();
    if let Some(r) = scene.node_mut(root) {
        r.rect = window.rect();
    }

    let mut report = LayoutReport::default();
    let mut skipped = HashSet::new();
    let order = scene.paint_order().to_vec();
    for id in order {
        let Some(n) = scene.node(id) else {
            continue;
        };
        if n.culled() || n.parent().is_some_and(|p| skipped.contains(&p)) {
            skipped.insert(id);
            continue;
        }
        match process(scene, id) {
            Ok((overflow, failed)) => {
                report.processed += 1;
                for (child, e) in failed {
                    warn!(node = ?child, parent = ?id, "layout failed: {e}");
                    report.errors.push((child, e));
                }
                toggles_for(scene, id, overflow, &mut report.toggles);
            }
            Err(e) => {
                warn!(node = ?id, "layout failed: {e}");
                report.errors.push((id, e));
            }
        }
    }
    trace!(
        processed = report.processed,
        errors = report.errors.len(),
        toggles = report.toggles.len(),
        "layout pass"
    );
    report
}

/// Recompute every painted node's visible area. Nodes clip against their
/// parent's visible area, overlays against the window.
pub fn update_viewables(scene: &mut Scene) {
    let window = scene.state().borrow().window_size.rect();
    let root = scene.root();
    let order = scene.paint_order().to_vec();
    for id in order {
        let Some(n) = scene.node(id) else {
            continue;
        };
        let clip = if id == root || n.kind().is_overlay() {
            Some(window)
        } else {
            n.parent().and_then(|p| scene.node(p)).and_then(|p| p.viewable())
        };
        let viewable = if n.culled() {
            None
        } else {
            clip.and_then(|c| n.rect().intersect(c))
        };
        if let Some(n) = scene.node_mut(id) {
            n.viewable = viewable;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Edges,
        invalidation::InvalidationState,
        layout::{LayoutSpec, Sizing},
        widgets::{FLOATING_BAND, dropdown::Direction},
    };

    fn scene(w: f32, h: f32) -> Scene {
        Scene::new(InvalidationState::shared(Size::new(w, h)))
    }

    fn settle(s: &mut Scene) -> Result<LayoutReport> {
        let mut last = LayoutReport::default();
        for _ in 0..8 {
            s.resolve_tree();
            last = layout_pass(s);
            if last.toggles.is_empty() {
                update_viewables(s);
                return Ok(last);
            }
            apply_toggles(s, &last.toggles)?;
        }
        Ok(last)
    }

    #[test]
    fn content_box_excludes_insets() -> Result<()> {
        let mut s = scene(100.0, 100.0);
        let a = s.create_with(
            NodeKind::Box,
            "a",
            LayoutSpec::fill()
                .padding(Edges::all(5.0))
                .border(Edges::all(1.0)),
        );
        s.append(s.root(), a)?;
        settle(&mut s)?;
        assert_eq!(s.get(a)?.rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(s.get(a)?.content(), Rect::new(6.0, 6.0, 88.0, 88.0));
        Ok(())
    }

    #[test]
    fn failing_node_keeps_last_geometry() -> Result<()> {
        let mut s = scene(100.0, 100.0);
        let outer = s.create_with(NodeKind::Box, "outer", LayoutSpec::row());
        let inner = s.create_with(NodeKind::Box, "inner", LayoutSpec::fixed(10.0, 10.0));
        s.append(s.root(), outer)?;
        s.append(outer, inner)?;
        let report = settle(&mut s)?;
        assert!(report.errors.is_empty());
        assert_eq!(s.get(outer)?.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));

        s.with_layout(inner, |l| l.width = Sizing::Fraction(0.5))?;
        let report = settle(&mut s)?;
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, outer);
        assert_eq!(s.get(outer)?.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
        Ok(())
    }

    #[test]
    fn conflicting_child_leaves_siblings_placed() -> Result<()> {
        let mut s = scene(200.0, 100.0);
        let good = s.create_with(NodeKind::Box, "good", LayoutSpec::fixed(50.0, 50.0));
        let bad = s.create_with(NodeKind::Box, "bad", LayoutSpec::default());
        let inner = s.create_with(
            NodeKind::Box,
            "inner",
            LayoutSpec::fixed(10.0, 10.0).width(Sizing::Fraction(0.5)),
        );
        let after = s.create_with(NodeKind::Box, "after", LayoutSpec::fixed(20.0, 20.0));
        s.append(s.root(), good)?;
        s.append(s.root(), bad)?;
        s.append(s.root(), after)?;
        s.append(bad, inner)?;
        let report = settle(&mut s)?;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].0, bad);
        assert!(matches!(
            report.errors[0].1,
            Error::FitFractionConflict { parent, child, .. } if parent == bad && child == inner
        ));
        assert_eq!(s.get(good)?.rect(), Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(s.get(after)?.rect(), Rect::new(50.0, 0.0, 20.0, 20.0));
        assert_eq!(s.get(bad)?.rect(), Rect::zero());
        Ok(())
    }

    #[test]
    fn scroll_offset_is_clamped_and_applied() -> Result<()> {
        let mut s = scene(100.0, 100.0);
        let c = s.create_with(
            NodeKind::Box,
            "c",
            LayoutSpec::column()
                .width(Sizing::Fill)
                .height(Sizing::Pixel(50.0))
                .scroll(false, true),
        );
        let tall = s.create_with(NodeKind::Box, "tall", LayoutSpec::fixed(20.0, 80.0));
        s.append(s.root(), c)?;
        s.append(c, tall)?;
        s.set_scroll_offset(c, Point::new(7.0, 500.0))?;
        settle(&mut s)?;
        assert_eq!(s.get(c)?.overflow().y, 30.0);
        assert_eq!(s.get(c)?.scroll().offset, Point::new(0.0, 30.0));
        assert_eq!(s.get(tall)?.rect().tl, Point::new(0.0, -30.0));
        assert_eq!(s.get(tall)?.viewable(), Some(Rect::new(0.0, 0.0, 20.0, 50.0)));
        Ok(())
    }

    #[test]
    fn floating_box_ignores_flow() -> Result<()> {
        let mut s = scene(100.0, 100.0);
        let a = s.create_with(NodeKind::Box, "a", LayoutSpec::fixed(30.0, 30.0));
        let f = s.create_with(
            NodeKind::FloatingBox,
            "f",
            LayoutSpec::fixed(50.0, 50.0).offset(Point::new(70.0, 70.0)),
        );
        let b = s.create_with(NodeKind::Box, "b", LayoutSpec::fixed(30.0, 30.0));
        s.append(s.root(), a)?;
        s.append(s.root(), f)?;
        s.append(s.root(), b)?;
        settle(&mut s)?;
        assert_eq!(s.get(b)?.rect().tl, Point::new(30.0, 0.0));
        assert_eq!(s.get(f)?.rect(), Rect::new(70.0, 70.0, 50.0, 50.0));
        assert_eq!(s.get(f)?.viewable(), Some(Rect::new(70.0, 70.0, 30.0, 30.0)));
        assert_eq!(s.get(f)?.depth(), 1 + FLOATING_BAND);
        Ok(())
    }

    #[test]
    fn overlays_escape_ancestor_clipping() -> Result<()> {
        let mut s = scene(200.0, 200.0);
        let clip = s.create_with(NodeKind::Box, "clip", LayoutSpec::fixed(40.0, 40.0));
        let dd = dropdown::build(&mut s, "dd", LayoutSpec::fixed(40.0, 20.0))?;
        let opt = s.create_with(NodeKind::Button, "opt", LayoutSpec::fixed(60.0, 30.0));
        s.append(s.root(), clip)?;
        s.append(clip, dd)?;
        dropdown::add_option(&mut s, dd, opt)?;
        dropdown::set_open(&mut s, dd, true)?;
        settle(&mut s)?;

        let container = dropdown::container(&s, dd);
        assert!(container.is_some());
        if let Some(container) = container {
            assert_eq!(s.get(container)?.rect(), Rect::new(0.0, 20.0, 60.0, 30.0));
            assert_eq!(
                s.get(container)?.viewable(),
                Some(Rect::new(0.0, 20.0, 60.0, 30.0))
            );
        }
        assert_eq!(s.get(opt)?.viewable(), Some(Rect::new(0.0, 20.0, 60.0, 30.0)));
        if let NodeKind::Dropdown(state) = s.get(dd)?.kind() {
            assert_eq!(state.placed(), Some(Direction::Down));
        }
        Ok(())
    }

    #[test]
    fn culled_and_clipped_nodes_have_no_viewable() -> Result<()> {
        let mut s = scene(100.0, 100.0);
        let a = s.create_with(NodeKind::Box, "a", LayoutSpec::fixed(0.0, 0.0));
        let b = s.create_with(NodeKind::Box, "b", LayoutSpec::fixed(10.0, 10.0));
        s.append(s.root(), a)?;
        s.append(a, b)?;
        settle(&mut s)?;
        assert_eq!(s.get(a)?.viewable(), None);
        assert_eq!(s.get(b)?.viewable(), None);
        Ok(())
    }
}
