//! Layout for kinds that place their children themselves.

use std::mem;

use crate::{
    NodeId,
    error::Result,
    geom::{Axis, Point, Rect, Size},
    layout::Sizing,
    scene::Scene,
    widgets::{
        DividerState, NodeKind, NodeTag, SliderState, TreeViewState, VirtualListState,
        divider::{redistribute, rescale, seed},
        list::visible_range,
        scrollbar::clamp_offset,
    },
};

use super::{Arrangement, sizing::base_extent, measure};

/// Panes take their stored pixel sizes, separators their own extent. Sizes
/// are seeded on first layout, rescaled when the space changes and then
/// adjusted by pending separator drags.
pub(super) fn divider(
    scene: &Scene,
    node: NodeId,
    state: &DividerState,
    content: Rect,
    children: &[NodeId],
    arr: &mut Arrangement,
) -> Result<()> {
    let axis = state.axis;
    let mut separators = 0.0;
    let mut panes = Vec::new();
    for child in children {
        if scene.get(*child)?.kind().tag() == NodeTag::DividerSeparator {
            separators += base_extent(scene, *child, content.size(), axis)?.unwrap_or(0.0);
        } else {
            panes.push(*child);
        }
    }
    let available = (content.extent(axis) - separators).max(0.0);

    let mut next = state.clone();
    if next.sizes.len() != panes.len() || next.available <= 0.0 {
        let mut fractions = Vec::with_capacity(panes.len());
        for p in &panes {
            fractions.push(match scene.get(*p)?.layout().sizing(axis) {
                Sizing::Fraction(f) => Some(f),
                _ => None,
            });
        }
        next.sizes = seed(&fractions, available);
    } else if next.available != available {
        rescale(&mut next.sizes, next.available, available);
    }
    next.available = available;

    let mut mins = Vec::with_capacity(panes.len());
    for p in &panes {
        mins.push(scene.get(*p)?.layout().min(axis).unwrap_or(0.0));
    }
    for (separator, delta) in mem::take(&mut next.pending) {
        redistribute(&mut next.sizes, &mins, separator, delta);
    }

    let cross = content.extent(axis.cross());
    let mut cursor = 0.0;
    let mut pane = 0;
    for child in children {
        let extent = if panes.get(pane) == Some(child) {
            pane += 1;
            next.sizes.get(pane - 1).copied().unwrap_or(0.0)
        } else {
            base_extent(scene, *child, content.size(), axis)?.unwrap_or(0.0)
        };
        let tl = content.tl + Point::from_main_cross(axis, cursor, 0.0);
        arr.flow.push((
            *child,
            Rect::from_origin(tl, Size::from_main_cross(axis, extent, cross)),
        ));
        cursor += extent;
    }
    arr.overflow.set_along(axis, cursor - content.extent(axis));
    arr.kinds.push((node, NodeKind::Divider(next)));
    Ok(())
}

/// The knob sits along the track at the value's fraction of the range,
/// centred across it. The track length is stored for drag conversion.
pub(super) fn slider(
    scene: &Scene,
    node: NodeId,
    state: &SliderState,
    content: Rect,
    children: &[NodeId],
    arr: &mut Arrangement,
) -> Result<()> {
    let axis = state.axis;
    let cross = axis.cross();
    let Some(knob) = children.first() else {
        return Ok(());
    };
    let size = measure(scene, *knob, content.size())?;
    let travel = (content.extent(axis) - size.along(axis)).max(0.0);
    let main = state.fraction() * travel;
    let across = (content.extent(cross) - size.along(cross)) / 2.0;
    let tl = content.tl + Point::from_main_cross(axis, main, across);
    arr.flow.push((*knob, Rect::from_origin(tl, size)));
    arr.overflow.set_along(axis, size.along(axis) - content.extent(axis));
    arr.overflow.set_along(cross, size.along(cross) - content.extent(cross));

    let mut next = state.clone();
    next.track = travel;
    arr.kinds.push((node, NodeKind::Slider(next)));
    Ok(())
}

/// Rows stack at fixed intervals. Only rows intersecting the scrolled view
/// are placed; the rest are culled. Overflow counts every row.
#[allow(clippy::too_many_arguments)]
pub(super) fn list(
    scene: &Scene,
    node: NodeId,
    state: &VirtualListState,
    content: Rect,
    offset: f32,
    children: &[NodeId],
    arr: &mut Arrangement,
) -> Result<()> {
    let extent = state.row_extent.max(0.0);
    let overflow_y = children.len() as f32 * extent - content.h;
    let offset = clamp_offset(offset, overflow_y);
    let visible = visible_range(children.len(), extent, offset, content.h);

    let mut widest = 0.0f32;
    for (i, row) in children.iter().enumerate() {
        if !visible.contains(&i) {
            arr.culled.push((*row, true));
            continue;
        }
        let layout = scene.get(*row)?.layout();
        let margin = layout.margin.along(Axis::Horizontal);
        let w = match base_extent(scene, *row, content.size(), Axis::Horizontal) {
            Ok(w) => w.unwrap_or(content.w - margin),
            Err(e) => {
                arr.errors.push((*row, e));
                continue;
            }
        };
        let w = layout.clamp(Axis::Horizontal, w);
        widest = widest.max(w + margin);
        let tl = content.tl + Point::new(layout.margin.left, i as f32 * extent);
        arr.flow.push((*row, Rect::from_origin(tl, Size::new(w, extent))));
        arr.culled.push((*row, false));
    }
    arr.overflow.x = widest - content.w;
    arr.overflow.y = overflow_y;

    let mut next = state.clone();
    next.visible = visible;
    arr.kinds.push((node, NodeKind::VirtualList(next)));
    Ok(())
}

/// Shift every item after the header right by the indent.
pub(super) fn indent(
    header: Option<NodeId>,
    state: &TreeViewState,
    content: Rect,
    arr: &mut Arrangement,
) {
    for (id, rect) in &mut arr.flow {
        if Some(*id) == header {
            continue;
        }
        *rect = rect.translate(Point::new(state.indent, 0.0));
        arr.overflow.x = arr.overflow.x.max(rect.right() - content.right());
    }
}
