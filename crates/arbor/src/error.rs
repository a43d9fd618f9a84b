use std::{result::Result as StdResult, sync::mpsc};

use thiserror::Error;

use crate::{NodeId, geom};

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Error, Debug, Clone)]
pub enum Error {
    /// No node with this id exists in the scene.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The node is already the child of another node.
    #[error("node already has a parent: {0:?}")]
    AlreadyParented(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// The window root cannot be appended, removed or destroyed.
    #[error("operation not permitted on the root node")]
    RootOperation,

    /// A fit-to-children axis contains a child sized as a fraction of it.
    #[error("fit parent {parent:?} has fraction-sized child {child:?} on the {axis:?} axis")]
    FitFractionConflict {
        /// The node sized to fit its children.
        parent: NodeId,
        /// The offending child.
        child: NodeId,
        /// The conflicting axis.
        axis: geom::Axis,
    },

    /// A grid child is placed outside the declared tracks.
    #[error("grid cell ({row}, {column}) of {child:?} outside {rows}x{columns} grid")]
    GridOutOfRange {
        /// The offending child.
        child: NodeId,
        /// First row of the cell.
        row: usize,
        /// First column of the cell.
        column: usize,
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        columns: usize,
    },

    /// Layout was still dirty after the maximum number of passes.
    #[error("layout did not settle after {0} passes")]
    LayoutDidNotSettle(usize),

    /// Invalid configuration.
    #[error("config: {0}")]
    Config(String),

    /// A queued task was dropped before it produced a result.
    #[error("task: {0}")]
    Task(String),

    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),

    /// Invalid input error.
    #[error("invalid: {0}")]
    Invalid(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl From<mpsc::RecvError> for Error {
    fn from(e: mpsc::RecvError) -> Self {
        Self::Task(e.to_string())
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
