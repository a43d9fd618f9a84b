use crate::{
    NodeId,
    error::Result,
    event::{Channel, Event, dispatch},
    geom::Axis,
    layout::{Flow, LayoutSpec, Sizing},
    scene::Scene,
    solver::flow_children,
    widgets::{NodeKind, NodeTag},
};

/// Divider payload. Pane sizes are kept in pixels so drags survive relayout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DividerState {
    /// Axis panes are arranged along.
    pub axis: Axis,
    /// Pane extents along the axis, seeded on first layout.
    pub(crate) sizes: Vec<f32>,
    /// Space available to panes when `sizes` was last fitted.
    pub(crate) available: f32,
    /// Separator drags not yet applied by layout.
    pub(crate) pending: Vec<(usize, f32)>,
}

impl DividerState {
    /// An unseeded divider along an axis.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Current pane extents.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }
}

/// Build a detached divider over existing panes, inserting a separator of
/// the given thickness between each pair. A pane's fraction along the axis
/// seeds its share; panes without one split what is left.
pub fn build(
    scene: &mut Scene,
    name: &str,
    axis: Axis,
    panes: &[NodeId],
    separator: f32,
) -> Result<NodeId> {
    let flow = match axis {
        Axis::Horizontal => Flow::Horizontal,
        Axis::Vertical => Flow::Vertical,
    };
    let divider = scene.create_with(
        NodeKind::Divider(DividerState::new(axis)),
        name,
        LayoutSpec::fill().flow(flow),
    );
    for (i, pane) in panes.iter().enumerate() {
        if i > 0 {
            let mut layout = LayoutSpec::default();
            layout.set_sizing(axis, Sizing::Pixel(separator));
            layout.set_sizing(axis.cross(), Sizing::Fill);
            let sep = scene.create_with(NodeKind::DividerSeparator, "separator", layout);
            scene.append(divider, sep)?;
        }
        scene.append(divider, *pane)?;
    }
    Ok(divider)
}

/// Initial pane extents: explicit fractions of the available length, with the
/// rest split evenly between panes that have none.
pub fn seed(fractions: &[Option<f32>], available: f32) -> Vec<f32> {
    let available = available.max(0.0);
    let claimed: f32 = fractions.iter().flatten().map(|f| f * available).sum();
    let unsized_panes = fractions.iter().filter(|f| f.is_none()).count();
    let share = if unsized_panes > 0 {
        (available - claimed).max(0.0) / unsized_panes as f32
    } else {
        0.0
    };
    fractions
        .iter()
        .map(|f| f.map_or(share, |f| (f * available).max(0.0)))
        .collect()
}

/// Scale extents proportionally to a new available length.
pub fn rescale(sizes: &mut [f32], from: f32, to: f32) {
    if from <= 0.0 {
        return;
    }
    let k = to.max(0.0) / from;
    for s in sizes {
        *s *= k;
    }
}

/// Move `delta` pixels across a separator: positive grows the pane before it
/// at the expense of the pane after. Neither pane drops below its minimum;
/// whatever cannot be absorbed is dropped. Returns the delta applied.
pub fn redistribute(sizes: &mut [f32], mins: &[f32], separator: usize, delta: f32) -> f32 {
    let (a, b) = (separator, separator + 1);
    if b >= sizes.len() {
        return 0.0;
    }
    let min = |i: usize| mins.get(i).copied().unwrap_or(0.0);
    let applied = if delta >= 0.0 {
        delta.min((sizes[b] - min(b)).max(0.0))
    } else {
        -(-delta).min((sizes[a] - min(a)).max(0.0))
    };
    sizes[a] += applied;
    sizes[b] -= applied;
    applied
}

/// Index of the separator `origin` among the laid-out children: the number
/// of visible panes before it, less one. Hidden panes take no part.
fn separator_index(scene: &Scene, node: NodeId, origin: NodeId) -> Option<usize> {
    let is_separator =
        |id: &NodeId| scene.node(*id).is_some_and(|n| n.kind().tag() == NodeTag::DividerSeparator);
    if !is_separator(&origin) {
        return None;
    }
    let children = flow_children(scene, node);
    let position = children.iter().position(|c| *c == origin)?;
    children[..position]
        .iter()
        .filter(|c| !is_separator(c))
        .count()
        .checked_sub(1)
}

/// Separator drags arrive here on the internal channel.
pub(crate) fn on_internal(scene: &mut Scene, node: NodeId, event: &Event) -> Result<()> {
    let Event::Drag { delta, origin } = event else {
        return Ok(());
    };
    let Some(separator) = separator_index(scene, node, *origin) else {
        return Ok(());
    };
    let along = scene.with_kind(node, |kind| {
        if let NodeKind::Divider(state) = kind {
            let along = delta.along(state.axis);
            state.pending.push((separator, along));
            along
        } else {
            0.0
        }
    })?;
    dispatch(
        scene,
        node,
        &Event::DividerMoved {
            separator,
            delta: along,
        },
        Channel::User,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding() {
        assert_eq!(seed(&[Some(0.5), Some(0.5)], 200.0), vec![100.0, 100.0]);
        assert_eq!(seed(&[Some(0.25), None, None], 200.0), vec![50.0, 75.0, 75.0]);
        assert_eq!(seed(&[None, None], -5.0), vec![0.0, 0.0]);
    }

    #[test]
    fn drag_moves_pixels() {
        let mut sizes = vec![100.0, 100.0];
        assert_eq!(redistribute(&mut sizes, &[0.0, 0.0], 0, 30.0), 30.0);
        assert_eq!(sizes, vec![130.0, 70.0]);
        assert_eq!(redistribute(&mut sizes, &[0.0, 0.0], 0, -50.0), -50.0);
        assert_eq!(sizes, vec![80.0, 120.0]);
    }

    #[test]
    fn drag_clamps_at_minimum() {
        let mut sizes = vec![100.0, 100.0];
        assert_eq!(redistribute(&mut sizes, &[0.0, 80.0], 0, 30.0), 20.0);
        assert_eq!(sizes, vec![120.0, 80.0]);
        assert_eq!(redistribute(&mut sizes, &[110.0, 0.0], 0, -30.0), -10.0);
        assert_eq!(sizes, vec![110.0, 90.0]);
    }

    #[test]
    fn drag_out_of_range_separator() {
        let mut sizes = vec![100.0, 100.0];
        assert_eq!(redistribute(&mut sizes, &[], 1, 30.0), 0.0);
        assert_eq!(sizes, vec![100.0, 100.0]);
    }

    #[test]
    fn rescaling() {
        let mut sizes = vec![150.0, 50.0];
        rescale(&mut sizes, 200.0, 400.0);
        assert_eq!(sizes, vec![300.0, 100.0]);
        rescale(&mut sizes, 0.0, 10.0);
        assert_eq!(sizes, vec![300.0, 100.0]);
    }

    #[test]
    fn build_interleaves_separators() -> Result<()> {
        let mut scene = Scene::default();
        let a = scene.create(NodeKind::Box, "a");
        let b = scene.create(NodeKind::Box, "b");
        let c = scene.create(NodeKind::Box, "c");
        let d = build(&mut scene, "split", Axis::Horizontal, &[a, b, c], 4.0)?;
        let children = scene.children(d).to_vec();
        assert_eq!(children.len(), 5);
        assert_eq!(children[0], a);
        assert_eq!(children[2], b);
        assert_eq!(children[4], c);
        let sep = scene.node(children[1]).map(|n| n.layout().width);
        assert_eq!(sep, Some(Sizing::Pixel(4.0)));
        Ok(())
    }
}
