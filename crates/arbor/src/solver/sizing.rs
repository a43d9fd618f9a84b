//! Size resolution: literal and proportional sizes, plus the eager
//! fit-to-children measurement.

use crate::{
    NodeId,
    error::{Error, Result},
    geom::{Axis, Size},
    layout::{Flow, LayoutSpec, Sizing, Track},
    scene::Scene,
    widgets::NodeKind,
};

use super::flow_children;

/// Extent along an axis before FILL distribution, unclamped. `None` for
/// FILL children, which the caller shares out.
pub(super) fn base_extent(
    scene: &Scene,
    child: NodeId,
    content: Size,
    axis: Axis,
) -> Result<Option<f32>> {
    let layout = &scene.get(child)?.layout;
    Ok(match layout.sizing(axis) {
        Sizing::Pixel(px) => Some(px),
        Sizing::Fraction(f) => Some(content.along(axis) * f),
        Sizing::Fit => Some(fit_extent(scene, child, axis)?),
        Sizing::Fill => None,
    })
}

/// Outer size of a node placed in a parent content area of `available`,
/// with FILL taking the whole area less margins.
pub fn measure(scene: &Scene, node: NodeId, available: Size) -> Result<Size> {
    let layout = &scene.get(node)?.layout;
    let mut size = Size::ZERO;
    for axis in Axis::BOTH {
        let extent = match base_extent(scene, node, available, axis)? {
            Some(v) => v,
            None => available.along(axis) - layout.margin.along(axis),
        };
        size.set_along(axis, layout.clamp(axis, extent));
    }
    Ok(size)
}

/// Outer extent of a node sized tightly around its own children. A child
/// sized as a fraction along a fitted axis is a conflict; FILL children
/// measure their own content.
pub fn fit_extent(scene: &Scene, node: NodeId, axis: Axis) -> Result<f32> {
    let n = scene.get(node)?;
    let spec = &n.layout;
    let children = flow_children(scene, node);
    let inner = match &n.kind {
        NodeKind::VirtualList(state) if axis == Axis::Vertical => {
            children.len() as f32 * state.row_extent
        }
        NodeKind::TreeView(state) if axis == Axis::Horizontal => {
            let mut widest = 0.0f32;
            for (i, child) in children.iter().enumerate() {
                let indent = if i == 0 { 0.0 } else { state.indent };
                widest = widest.max(child_fit(scene, node, *child, axis)? + indent);
            }
            widest
        }
        _ if spec.flow == Flow::Grid => grid_fit(scene, node, spec, &children, axis)?,
        _ => linear_fit(scene, node, spec, &children, axis)?,
    };
    let bar = match axis {
        Axis::Horizontal if n.scroll.vertical.is_some() => spec.scrollbar_size,
        Axis::Vertical if n.scroll.horizontal.is_some() => spec.scrollbar_size,
        _ => 0.0,
    };
    Ok(spec.clamp(axis, inner + spec.insets().along(axis) + bar))
}

/// Space a child claims inside a fitted parent, margins included.
fn child_fit(scene: &Scene, parent: NodeId, child: NodeId, axis: Axis) -> Result<f32> {
    let layout = &scene.get(child)?.layout;
    let extent = match layout.sizing(axis) {
        Sizing::Pixel(px) => layout.clamp(axis, px),
        Sizing::Fraction(_) => return Err(Error::FitFractionConflict { parent, child, axis }),
        Sizing::Fit | Sizing::Fill => fit_extent(scene, child, axis)?,
    };
    Ok(extent + layout.margin.along(axis))
}

/// Linear flows sum along the flow axis and take the maximum across it.
fn linear_fit(
    scene: &Scene,
    parent: NodeId,
    spec: &LayoutSpec,
    children: &[NodeId],
    axis: Axis,
) -> Result<f32> {
    let mut sum = 0.0;
    let mut max = 0.0f32;
    for child in children {
        let e = child_fit(scene, parent, *child, axis)?;
        sum += e;
        max = max.max(e);
    }
    if axis == spec.flow.axis() {
        Ok(sum + spec.gap * children.len().saturating_sub(1) as f32)
    } else {
        Ok(max)
    }
}

/// Grids sum their tracks. Fractional tracks take the widest single-span
/// child starting in them.
fn grid_fit(
    scene: &Scene,
    parent: NodeId,
    spec: &LayoutSpec,
    children: &[NodeId],
    axis: Axis,
) -> Result<f32> {
    let tracks = spec.grid.tracks(axis);
    if tracks.is_empty() {
        return linear_fit(scene, parent, spec, children, axis);
    }
    let mut sizes: Vec<f32> = tracks
        .iter()
        .map(|t| match t {
            Track::Fixed(px) => *px,
            Track::Fraction(_) => 0.0,
        })
        .collect();
    for child in children {
        let cell = scene.get(*child)?.layout.grid_cell;
        let (start, span) = (cell.start(axis), cell.span(axis));
        if span != 1 || !matches!(tracks.get(start), Some(Track::Fraction(_))) {
            continue;
        }
        let e = child_fit(scene, parent, *child, axis)?;
        sizes[start] = sizes[start].max(e);
    }
    Ok(sizes.iter().sum::<f32>() + spec.gap * tracks.len().saturating_sub(1) as f32)
}
