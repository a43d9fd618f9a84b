//! Test doubles and a harness for driving a window without a platform.

/// Scripted window backend and recording renderer.
pub mod backend;
/// Harness for scene testing.
pub mod harness;

pub use backend::{RecordingRenderer, ScriptedBackend, ScriptedInput};
pub use harness::Harness;
