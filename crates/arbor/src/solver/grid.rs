//! Grid flow: explicit column and row tracks.

use crate::{
    NodeId,
    error::{Error, Result},
    geom::{Axis, Point, Rect, Size},
    layout::{LayoutSpec, Track},
    scene::Scene,
};

use super::{Arrangement, Overflow, sizing::base_extent};

/// Resolve tracks to `(start, size)` pairs. Fixed tracks take their size;
/// fractional tracks split what is left after fixed tracks and gaps.
pub fn tracks(tracks: &[Track], available: f32, gap: f32) -> Vec<(f32, f32)> {
    let gaps = gap * tracks.len().saturating_sub(1) as f32;
    let mut fixed = 0.0;
    let mut fr = 0.0;
    for t in tracks {
        match t {
            Track::Fixed(px) => fixed += px,
            Track::Fraction(f) => fr += f,
        }
    }
    let leftover = (available - fixed - gaps).max(0.0);
    let mut cursor = 0.0;
    tracks
        .iter()
        .map(|t| {
            let size = match t {
                Track::Fixed(px) => *px,
                Track::Fraction(f) if fr > 0.0 => leftover * f / fr,
                Track::Fraction(_) => 0.0,
            };
            let start = cursor;
            cursor += size + gap;
            (start, size)
        })
        .collect()
}

/// A single fractional track, used when a grid declares none on an axis.
const IMPLICIT: [Track; 1] = [Track::Fraction(1.0)];

/// Lay out grid children in their declared cells.
pub(super) fn arrange(
    scene: &Scene,
    spec: &LayoutSpec,
    content: Rect,
    children: &[NodeId],
    arr: &mut Arrangement,
) -> Result<()> {
    let resolved = |axis: Axis| {
        let declared = spec.grid.tracks(axis);
        let declared = if declared.is_empty() {
            &IMPLICIT[..]
        } else {
            declared
        };
        tracks(declared, content.extent(axis), spec.gap)
    };
    let cols = resolved(Axis::Horizontal);
    let rows = resolved(Axis::Vertical);

    let mut used = Size::ZERO;
    for t in [(Axis::Horizontal, &cols), (Axis::Vertical, &rows)] {
        if let Some((start, size)) = t.1.last() {
            used.set_along(t.0, start + size);
        }
    }

    for child in children {
        let layout = &scene.get(*child)?.layout;
        let cell = layout.grid_cell;
        let (row_end, col_end) = (
            cell.row + cell.span(Axis::Vertical),
            cell.column + cell.span(Axis::Horizontal),
        );
        if row_end > rows.len() || col_end > cols.len() {
            arr.errors.push((
                *child,
                Error::GridOutOfRange {
                    child: *child,
                    row: cell.row,
                    column: cell.column,
                    rows: rows.len(),
                    columns: cols.len(),
                },
            ));
            continue;
        }
        let span = |t: &[(f32, f32)], first: usize, end: usize| {
            let (start, _) = t[first];
            let (last, size) = t[end - 1];
            (start, last + size - start)
        };
        let (x, w) = span(&cols, cell.column, col_end);
        let (y, h) = span(&rows, cell.row, row_end);
        let cell_size = Size::new(w, h);
        let sized = base_extent(scene, *child, cell_size, Axis::Horizontal)
            .and_then(|bw| Ok((bw, base_extent(scene, *child, cell_size, Axis::Vertical)?)));
        let bases = match sized {
            Ok(bases) => bases,
            Err(e) => {
                arr.errors.push((*child, e));
                continue;
            }
        };

        let align = layout.align_self.unwrap_or(spec.align_children);
        let mut size = Size::ZERO;
        let mut offset = Point::zero();
        for axis in Axis::BOTH {
            let avail = cell_size.along(axis);
            let margins = layout.margin.along(axis);
            let base = match axis {
                Axis::Horizontal => bases.0,
                Axis::Vertical => bases.1,
            };
            let extent = base.unwrap_or(avail - margins);
            let extent = layout.clamp(axis, extent);
            size.set_along(axis, extent);
            offset.set_along(
                axis,
                align.along(axis).offset(extent + margins, avail) + layout.margin.start(axis),
            );
            let end = Point::new(x, y).along(axis) + offset.along(axis) + extent;
            used.set_along(axis, used.along(axis).max(end));
        }
        let tl = content.tl + Point::new(x, y) + offset;
        arr.flow.push((*child, Rect::from_origin(tl, size)));
    }

    arr.overflow = Overflow::new(used.w - content.w, used.h - content.h);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layout::{Align, Alignment, GridPlacement, Sizing},
        widgets::NodeKind,
    };

    #[test]
    fn track_resolution() {
        let t = tracks(
            &[Track::Fixed(20.0), Track::Fraction(1.0), Track::Fraction(3.0)],
            120.0,
            10.0,
        );
        assert_eq!(t, vec![(0.0, 20.0), (30.0, 20.0), (60.0, 60.0)]);
    }

    #[test]
    fn fraction_tracks_never_negative() {
        let t = tracks(&[Track::Fixed(100.0), Track::Fraction(1.0)], 50.0, 0.0);
        assert_eq!(t, vec![(0.0, 100.0), (100.0, 0.0)]);
    }

    #[test]
    fn cells_and_alignment() -> Result<()> {
        let mut scene = Scene::default();
        let spec = LayoutSpec::grid(
            vec![Track::Fraction(1.0), Track::Fraction(1.0)],
            vec![Track::Fixed(40.0)],
        )
        .align_children(Alignment::both(Align::Center));
        let g = scene.create_with(NodeKind::Box, "g", spec.clone());
        let a = scene.create_with(
            NodeKind::Box,
            "a",
            LayoutSpec::fixed(10.0, 10.0).cell(GridPlacement::cell(0, 1)),
        );
        let b = scene.create_with(
            NodeKind::Box,
            "b",
            LayoutSpec::default()
                .width(Sizing::Fill)
                .height(Sizing::Fraction(0.5))
                .cell(GridPlacement::cell(0, 0)),
        );
        scene.append(g, a)?;
        scene.append(g, b)?;
        let mut arr = Arrangement::default();
        arrange(&scene, &spec, Rect::new(0.0, 0.0, 100.0, 60.0), &[a, b], &mut arr)?;
        assert_eq!(arr.flow[0].1, Rect::new(70.0, 15.0, 10.0, 10.0));
        assert_eq!(arr.flow[1].1, Rect::new(0.0, 10.0, 50.0, 20.0));
        assert_eq!(arr.overflow, Overflow::new(0.0, -20.0));
        Ok(())
    }

    #[test]
    fn out_of_range_cell() -> Result<()> {
        let mut scene = Scene::default();
        let spec = LayoutSpec::grid(vec![Track::Fixed(10.0)], vec![Track::Fixed(10.0)]);
        let g = scene.create_with(NodeKind::Box, "g", spec.clone());
        let mut placement = GridPlacement::cell(0, 0);
        placement.column_span = 2;
        let a = scene.create_with(NodeKind::Box, "a", LayoutSpec::fixed(1.0, 1.0).cell(placement));
        scene.append(g, a)?;
        let b = scene.create_with(NodeKind::Box, "b", LayoutSpec::fixed(1.0, 1.0));
        scene.append(g, b)?;
        let mut arr = Arrangement::default();
        arrange(&scene, &spec, Rect::new(0.0, 0.0, 10.0, 10.0), &[a, b], &mut arr)?;
        assert_eq!(
            arr.errors,
            vec![(
                a,
                Error::GridOutOfRange {
                    child: a,
                    row: 0,
                    column: 0,
                    rows: 1,
                    columns: 1
                }
            )]
        );
        assert_eq!(arr.flow, vec![(b, Rect::new(0.0, 0.0, 1.0, 1.0))]);
        Ok(())
    }
}
