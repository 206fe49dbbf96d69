//! Boundary with the native renderer.
//!
//! - `ffi`: C layouts shared with the renderer
//! - `callbacks`: the table the renderer calls into from its own threads
//! - `resource`: ownership of native handles
//! - `renderer`: the per-frame tick the render loop drives

mod callbacks;
mod log_handler;
mod renderer;
mod resource;

pub mod ffi;

#[cfg(feature = "bgfx")]
pub mod bgfx;

pub use callbacks::{CallbackBridge, CallbackHandler, FatalKind};
pub use log_handler::{LogHandler, NATIVE_TARGET};
pub use renderer::{NativeRenderer, RenderFrame};
pub use resource::{NativeHandle, NativeResource};
