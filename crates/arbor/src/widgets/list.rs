use std::ops::Range;

use crate::{
    NodeId,
    error::Result,
    layout::LayoutSpec,
    scene::Scene,
    widgets::NodeKind,
};

/// Virtualized list payload. Every row has the same extent, so the visible
/// window can be computed without measuring rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VirtualListState {
    /// Row height in pixels.
    pub row_extent: f32,
    /// Rows placed by the last layout.
    pub(crate) visible: Range<usize>,
}

impl VirtualListState {
    /// A list with fixed-height rows.
    pub fn new(row_extent: f32) -> Self {
        Self {
            row_extent,
            visible: 0..0,
        }
    }

    /// Rows placed by the last layout.
    pub fn visible(&self) -> Range<usize> {
        self.visible.clone()
    }
}

/// Rows intersecting a view of `view` pixels starting `offset` pixels into
/// the list.
pub fn visible_range(count: usize, row_extent: f32, offset: f32, view: f32) -> Range<usize> {
    if row_extent <= 0.0 {
        return 0..count;
    }
    let offset = offset.max(0.0);
    let first = ((offset / row_extent).floor() as usize).min(count);
    let last = (((offset + view.max(0.0)) / row_extent).ceil() as usize).clamp(first, count);
    first..last
}

/// Build a detached vertical list that scrolls vertically.
pub fn build(scene: &mut Scene, name: &str, row_extent: f32, layout: LayoutSpec) -> NodeId {
    scene.create_with(
        NodeKind::VirtualList(VirtualListState::new(row_extent)),
        name,
        layout.scroll(false, true),
    )
}

/// Append a row.
pub fn push(scene: &mut Scene, list: NodeId, row: NodeId) -> Result<()> {
    scene.append(list, row)
}
