//! Horizontal and vertical flows, with optional wrapping.

use std::ops::Range;

use crate::{
    NodeId,
    error::{Error, Result},
    geom::{Axis, Edges, Point, Rect, Size},
    layout::{Alignment, LayoutSpec, Spacing},
    scene::Scene,
};

use super::{Arrangement, Overflow, sizing::base_extent};

/// A child with its resolved size.
#[derive(Debug, Clone, Copy)]
struct Item {
    /// Child id.
    id: NodeId,
    /// Resolved outer size, clamped.
    size: Size,
    /// Child margins.
    margin: Edges,
    /// Effective alignment within the line.
    align: Alignment,
}

impl Item {
    /// Size plus margins along an axis.
    fn outer(&self, axis: Axis) -> f32 {
        self.size.along(axis) + self.margin.along(axis)
    }
}

/// Lay out children along the flow axis of `spec` inside `content`.
pub(super) fn arrange(
    scene: &Scene,
    spec: &LayoutSpec,
    content: Rect,
    children: &[NodeId],
    arr: &mut Arrangement,
) -> Result<()> {
    let axis = spec.flow.axis();
    let cross = axis.cross();
    let avail = content.size();
    let items = resolve(scene, spec, avail, children, &mut arr.errors)?;
    let lines = break_lines(spec, avail.along(axis), &items);

    let mut cross_cursor = 0.0;
    let mut max_main = 0.0f32;
    let mut max_cross = 0.0f32;
    for line in lines {
        let line = &items[line];
        let line_cross = if spec.wrap {
            line.iter().map(|it| it.outer(cross)).fold(0.0, f32::max)
        } else {
            avail.along(cross)
        };

        let mut packed = Vec::with_capacity(line.len());
        let mut cursor = 0.0;
        for (i, it) in line.iter().enumerate() {
            if i > 0 {
                cursor += spec.gap;
            }
            cursor += it.margin.start(axis);
            packed.push(cursor);
            cursor += it.size.along(axis) + it.margin.end(axis);
        }
        max_main = max_main.max(cursor);
        let shifts = justify(spec, axis, cursor, avail.along(axis), line.len());

        for ((it, main), shift) in line.iter().zip(packed).zip(shifts) {
            let outer_cross = it.outer(cross);
            max_cross = max_cross.max(cross_cursor + outer_cross);
            let c = cross_cursor
                + it.align.along(cross).offset(outer_cross, line_cross)
                + it.margin.start(cross);
            let tl = content.tl + Point::from_main_cross(axis, main + shift, c);
            arr.flow.push((it.id, Rect::from_origin(tl, it.size)));
        }
        cross_cursor += line_cross + spec.gap;
    }

    let used_cross = if spec.wrap {
        (cross_cursor - spec.gap).max(0.0)
    } else {
        max_cross
    };
    let mut overflow = Overflow::default();
    overflow.set_along(axis, max_main - avail.along(axis));
    overflow.set_along(cross, used_cross - avail.along(cross));
    arr.overflow = overflow;
    Ok(())
}

/// Resolve child sizes, sharing leftover flow-axis space between FILL
/// children. Children that cannot be sized are reported and left out.
fn resolve(
    scene: &Scene,
    spec: &LayoutSpec,
    avail: Size,
    children: &[NodeId],
    errors: &mut Vec<(NodeId, Error)>,
) -> Result<Vec<Item>> {
    let axis = spec.flow.axis();
    let cross = axis.cross();
    let mut bases = Vec::with_capacity(children.len());
    let mut used = 0.0;
    let mut fills = 0usize;
    for child in children {
        let sized = base_extent(scene, *child, avail, axis)
            .and_then(|main| Ok((main, base_extent(scene, *child, avail, cross)?)));
        let (main, across) = match sized {
            Ok(extents) => extents,
            Err(e) => {
                errors.push((*child, e));
                continue;
            }
        };
        let layout = &scene.get(*child)?.layout;
        used += layout.margin.along(axis) + main.unwrap_or(0.0);
        if main.is_none() {
            fills += 1;
        }
        bases.push((*child, main, across));
    }
    used += spec.gap * bases.len().saturating_sub(1) as f32;
    let share = if fills > 0 {
        ((avail.along(axis) - used) / fills as f32).max(0.0)
    } else {
        0.0
    };

    let mut items = Vec::with_capacity(bases.len());
    for (child, main, across) in bases {
        let layout = &scene.get(child)?.layout;
        let main = layout.clamp(axis, main.unwrap_or(share));
        let across = layout.clamp(
            cross,
            across.unwrap_or(avail.along(cross) - layout.margin.along(cross)),
        );
        items.push(Item {
            id: child,
            size: Size::from_main_cross(axis, main, across),
            margin: layout.margin,
            align: layout.align_self.unwrap_or(spec.align_children),
        });
    }
    Ok(items)
}

/// Split items into lines. A line always takes at least one item, so only a
/// line's first item can cross the end of the content.
fn break_lines(spec: &LayoutSpec, avail: f32, items: &[Item]) -> Vec<Range<usize>> {
    if !spec.wrap || items.is_empty() {
        return vec![0..items.len()];
    }
    let axis = spec.flow.axis();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut cursor = 0.0;
    for (i, it) in items.iter().enumerate() {
        let outer = it.outer(axis);
        if i == start {
            cursor = outer;
        } else if cursor + spec.gap + outer > avail {
            lines.push(start..i);
            start = i;
            cursor = outer;
        } else {
            cursor += spec.gap + outer;
        }
    }
    lines.push(start..items.len());
    lines
}

/// Per-child flow-axis shifts distributing a line's leftover space.
fn justify(spec: &LayoutSpec, axis: Axis, extent: f32, avail: f32, n: usize) -> Vec<f32> {
    let leftover = avail - extent;
    if leftover <= 0.0 || n == 0 {
        return vec![0.0; n];
    }
    match spec.spacing {
        Spacing::EvenWithGap => {
            let slot = leftover / n as f32;
            (0..n).map(|i| slot * (i as f32 + 0.5)).collect()
        }
        Spacing::EvenNoGap if n > 1 => {
            let slot = leftover / (n - 1) as f32;
            (0..n).map(|i| slot * i as f32).collect()
        }
        Spacing::Tight | Spacing::EvenNoGap => {
            vec![spec.align_children.along(axis).offset(extent, avail); n]
        }
    }
}
