//! Normalized events and the cross-thread queue that carries them.
//!
//! The platform thread produces, the render thread consumes. Nothing in here
//! knows about winit or the native renderer.

mod queue;
mod types;

pub use queue::EventQueue;
pub use types::{ButtonKind, ButtonState, Event, KeyCode, ModifierSet};
