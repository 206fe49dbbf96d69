//! Thread topology: the platform event loop, the render loop it feeds, and
//! the shutdown handshake between them.
//!
//! - `coordinator`: render-thread side; drains the queue and ticks the renderer
//! - `platform`: winit side; owns the window and translates input

mod coordinator;
mod platform;

pub use coordinator::{ExitReason, RenderLoop};
pub use platform::{Runtime, RuntimeConfig};
pub use winit::window::Window;
