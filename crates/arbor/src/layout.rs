//! The layout specification attached to every node.
//!
//! A [`LayoutSpec`] describes how a node wants to be sized by its parent and
//! how it arranges its own children. Builders mirror the common cases:
//!
//! ```
//! use arbor::layout::{LayoutSpec, Sizing};
//!
//! let toolbar = LayoutSpec::row().width(Sizing::Fill).height(Sizing::Pixel(32.0)).gap(4.0);
//! assert_eq!(toolbar.height, Sizing::Pixel(32.0));
//! ```

use serde::Serialize;

use crate::geom::{Axis, Corners, Edges, Point};

/// How a node is sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub enum Sizing {
    /// A literal size in pixels.
    Pixel(f32),
    /// A fraction of the parent's content size.
    Fraction(f32),
    /// The tightest size enclosing the node's own children.
    #[default]
    Fit,
    /// An even share of the parent's remaining space.
    Fill,
}

/// The direction children are arranged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Flow {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Explicit rows and columns.
    Grid,
}

impl Flow {
    /// The main axis of a linear flow. Grids report horizontal.
    pub fn axis(self) -> Axis {
        match self {
            Self::Horizontal | Self::Grid => Axis::Horizontal,
            Self::Vertical => Axis::Vertical,
        }
    }
}

/// Alignment of a box within available space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Align {
    /// Leading edge.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Trailing edge.
    End,
}

impl Align {
    /// Offset that aligns `extent` within `available`. Negative leftover
    /// (content larger than the space) never shifts content.
    pub fn offset(self, extent: f32, available: f32) -> f32 {
        let leftover = (available - extent).max(0.0);
        match self {
            Self::Start => 0.0,
            Self::Center => leftover / 2.0,
            Self::End => leftover,
        }
    }
}

/// Alignment on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Alignment {
    /// Horizontal alignment.
    pub horizontal: Align,
    /// Vertical alignment.
    pub vertical: Align,
}

impl Alignment {
    /// Same alignment on both axes.
    pub fn both(align: Align) -> Self {
        Self {
            horizontal: align,
            vertical: align,
        }
    }

    /// Alignment along an axis.
    pub fn along(&self, axis: Axis) -> Align {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// How leftover space along the flow axis is distributed between children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Spacing {
    /// Children are packed, separated only by the fixed gap.
    #[default]
    Tight,
    /// Leftover is split into one slot per child, half before and half after
    /// each child.
    EvenWithGap,
    /// Leftover is split between children, with no space at either end.
    EvenNoGap,
}

/// A grid track size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Track {
    /// Fixed size in pixels.
    Fixed(f32),
    /// Share of the space left after fixed tracks, in fraction units.
    Fraction(f32),
}

/// Column and row tracks for a grid flow.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct GridTemplate {
    /// Column tracks, left to right.
    pub columns: Vec<Track>,
    /// Row tracks, top to bottom.
    pub rows: Vec<Track>,
}

impl GridTemplate {
    /// Construct a template from column and row tracks.
    pub fn new(columns: Vec<Track>, rows: Vec<Track>) -> Self {
        Self { columns, rows }
    }

    /// Tracks along an axis: columns for horizontal, rows for vertical.
    pub fn tracks(&self, axis: Axis) -> &[Track] {
        match axis {
            Axis::Horizontal => &self.columns,
            Axis::Vertical => &self.rows,
        }
    }
}

/// The cell a child occupies in its parent's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPlacement {
    /// Starting row.
    pub row: usize,
    /// Starting column.
    pub column: usize,
    /// Rows spanned.
    pub row_span: usize,
    /// Columns spanned.
    pub column_span: usize,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self::cell(0, 0)
    }
}

impl GridPlacement {
    /// A single cell.
    pub fn cell(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            row_span: 1,
            column_span: 1,
        }
    }

    /// Start index along an axis.
    pub fn start(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.column,
            Axis::Vertical => self.row,
        }
    }

    /// Span along an axis, at least one.
    pub fn span(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.column_span.max(1),
            Axis::Vertical => self.row_span.max(1),
        }
    }
}

/// Default scrollbar thickness in pixels.
pub const DEFAULT_SCROLLBAR_SIZE: f32 = 10.0;

/// Layout configuration for a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    /// Horizontal sizing.
    pub width: Sizing,
    /// Vertical sizing.
    pub height: Sizing,
    /// Child arrangement.
    pub flow: Flow,
    /// Wrap children onto new lines when the flow axis is exhausted.
    pub wrap: bool,
    /// Outer spacing, outside the box.
    pub margin: Edges,
    /// Inner spacing, between border and content.
    pub padding: Edges,
    /// Border widths.
    pub border: Edges,
    /// Corner radii, for the renderer.
    pub radius: Corners,
    /// Override for this node's alignment within its parent's line or cell.
    pub align_self: Option<Alignment>,
    /// Alignment of children within this node's content box.
    pub align_children: Alignment,
    /// Distribution of leftover space along the flow axis.
    pub spacing: Spacing,
    /// Fixed gap between adjacent children and between wrapped lines.
    pub gap: f32,
    /// Minimum width.
    pub min_width: Option<f32>,
    /// Maximum width.
    pub max_width: Option<f32>,
    /// Minimum height.
    pub min_height: Option<f32>,
    /// Maximum height.
    pub max_height: Option<f32>,
    /// Grid tracks, used when `flow` is [`Flow::Grid`].
    pub grid: GridTemplate,
    /// This node's cell when its parent is a grid.
    pub grid_cell: GridPlacement,
    /// Attach a horizontal scrollbar when children overflow horizontally.
    pub scroll_x: bool,
    /// Attach a vertical scrollbar when children overflow vertically.
    pub scroll_y: bool,
    /// Scrollbar thickness.
    pub scrollbar_size: f32,
    /// Position relative to the parent's content origin, for floating boxes.
    pub offset: Point,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            width: Sizing::Fit,
            height: Sizing::Fit,
            flow: Flow::Horizontal,
            wrap: false,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            border: Edges::ZERO,
            radius: Corners::default(),
            align_self: None,
            align_children: Alignment::default(),
            spacing: Spacing::Tight,
            gap: 0.0,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            grid: GridTemplate::default(),
            grid_cell: GridPlacement::default(),
            scroll_x: false,
            scroll_y: false,
            scrollbar_size: DEFAULT_SCROLLBAR_SIZE,
            offset: Point::zero(),
        }
    }
}

impl LayoutSpec {
    /// A horizontal flow.
    pub fn row() -> Self {
        Self::default()
    }

    /// A vertical flow.
    pub fn column() -> Self {
        Self {
            flow: Flow::Vertical,
            ..Self::default()
        }
    }

    /// A grid with the given tracks.
    pub fn grid(columns: Vec<Track>, rows: Vec<Track>) -> Self {
        Self {
            flow: Flow::Grid,
            grid: GridTemplate::new(columns, rows),
            ..Self::default()
        }
    }

    /// Fill the parent on both axes.
    pub fn fill() -> Self {
        Self::default().width(Sizing::Fill).height(Sizing::Fill)
    }

    /// Fixed pixel size on both axes.
    pub fn fixed(w: f32, h: f32) -> Self {
        Self::default()
            .width(Sizing::Pixel(w))
            .height(Sizing::Pixel(h))
    }

    /// Set horizontal sizing.
    pub fn width(mut self, sizing: Sizing) -> Self {
        self.width = sizing;
        self
    }

    /// Set vertical sizing.
    pub fn height(mut self, sizing: Sizing) -> Self {
        self.height = sizing;
        self
    }

    /// Set the child flow.
    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    /// Enable or disable wrapping.
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set margins.
    pub fn margin(mut self, margin: Edges) -> Self {
        self.margin = margin;
        self
    }

    /// Set padding.
    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    /// Set border widths.
    pub fn border(mut self, border: Edges) -> Self {
        self.border = border;
        self
    }

    /// Set the gap between children.
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Set the spacing policy.
    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set child alignment.
    pub fn align_children(mut self, alignment: Alignment) -> Self {
        self.align_children = alignment;
        self
    }

    /// Set this node's own alignment override.
    pub fn align_self(mut self, alignment: Alignment) -> Self {
        self.align_self = Some(alignment);
        self
    }

    /// Set the minimum width.
    pub fn min_width(mut self, v: f32) -> Self {
        self.min_width = Some(v);
        self
    }

    /// Set the maximum width.
    pub fn max_width(mut self, v: f32) -> Self {
        self.max_width = Some(v);
        self
    }

    /// Set the minimum height.
    pub fn min_height(mut self, v: f32) -> Self {
        self.min_height = Some(v);
        self
    }

    /// Set the maximum height.
    pub fn max_height(mut self, v: f32) -> Self {
        self.max_height = Some(v);
        self
    }

    /// Place this node in a grid cell.
    pub fn cell(mut self, placement: GridPlacement) -> Self {
        self.grid_cell = placement;
        self
    }

    /// Allow scrolling on each axis.
    pub fn scroll(mut self, x: bool, y: bool) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }

    /// Set the floating offset.
    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Sizing along an axis.
    pub fn sizing(&self, axis: Axis) -> Sizing {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Replace sizing along an axis.
    pub fn set_sizing(&mut self, axis: Axis, sizing: Sizing) {
        match axis {
            Axis::Horizontal => self.width = sizing,
            Axis::Vertical => self.height = sizing,
        }
    }

    /// Is scrolling allowed along an axis?
    pub fn scrolls(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.scroll_x,
            Axis::Vertical => self.scroll_y,
        }
    }

    /// Minimum size along an axis.
    pub fn min(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    /// Maximum size along an axis.
    pub fn max(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.max_width,
            Axis::Vertical => self.max_height,
        }
    }

    /// Padding plus border.
    pub fn insets(&self) -> Edges {
        self.padding + self.border
    }

    /// Clamp a size along an axis against this spec's min/max bounds. A min
    /// larger than the max is treated as the max.
    pub fn clamp(&self, axis: Axis, value: f32) -> f32 {
        let (min, max) = match (self.min(axis), self.max(axis)) {
            (Some(min), Some(max)) if min > max => (Some(max), Some(max)),
            other => other,
        };
        let mut value = value.max(0.0);
        if let Some(max) = max {
            value = value.min(max);
        }
        if let Some(min) = min {
            value = value.max(min);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_no_bounds() {
        assert_eq!(LayoutSpec::row().clamp(Axis::Horizontal, 5.0), 5.0);
    }

    #[test]
    fn clamp_min_greater_than_max() {
        let spec = LayoutSpec::row().min_width(10.0).max_width(4.0);
        assert_eq!(spec.clamp(Axis::Horizontal, 7.0), 4.0);
    }

    #[test]
    fn clamp_negative_is_zero() {
        assert_eq!(LayoutSpec::row().clamp(Axis::Vertical, -3.0), 0.0);
    }

    #[test]
    fn align_offset() {
        assert_eq!(Align::Center.offset(4.0, 10.0), 3.0);
        assert_eq!(Align::End.offset(4.0, 10.0), 6.0);
        assert_eq!(Align::End.offset(14.0, 10.0), 0.0);
    }
}
