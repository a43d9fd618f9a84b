//! Geometry primitives used across arbor.
//!
//! All coordinates are in window pixels, with the origin at the top-left of
//! the window and y growing downwards.

#![warn(missing_docs)]

/// Four-sided corner radii.
mod corners;
/// Four-sided insets.
mod edges;
/// Error types for geometry operations.
mod error;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use corners::Corners;
pub use edges::Edges;
pub use error::{Error, Result};
pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// A layout axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Both axes, horizontal first.
    pub const BOTH: [Self; 2] = [Self::Horizontal, Self::Vertical];
}
