//! A retained-mode UI core: a node arena with dirty-flag invalidation, a
//! box-model layout solver with flow, grid and scrolling, and pointer and
//! keyboard routing by hit-testing the resolved geometry.

pub mod backend;
pub mod config;
pub mod dump;
/// Crate errors.
pub mod error;
pub mod event;
/// Node identifiers.
mod id;
/// Dirty flags and shared per-window state.
pub mod invalidation;
pub mod layout;
pub mod logging;
/// Node records.
pub mod node;
pub mod resources;
pub mod router;
/// The node arena and tree operations.
pub mod scene;
pub mod solver;
/// Node names.
pub mod state;
pub mod tasks;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod widgets;
pub mod window;

pub use arbor_geom as geom;

pub use backend::{CursorShape, InputSink, Renderer, WindowBackend};
pub use config::WindowConfig;
pub use error::{Error, Result};
pub use event::{Channel, Event, EventKind, Key, MouseButton};
pub use id::NodeId;
pub use invalidation::LayoutActions;
pub use layout::{Align, Alignment, Flow, LayoutSpec, Sizing, Spacing, Track};
pub use node::Node;
pub use scene::Scene;
pub use solver::Overflow;
pub use widgets::{NodeKind, NodeTag};
pub use window::{LayoutSummary, Window};

// Geometry types used throughout the API.
pub use geom::{Axis, Corners, Edges, Point, Rect, Size};
