//! gfxbridge engine crate.
//!
//! Boundary layer between a platform window and a native renderer: input
//! translation on the platform thread, a thread-safe event queue, and a
//! render loop that drives the renderer's frame tick. The `native` module
//! owns the C callback table and native handle lifetimes.

pub mod core;
pub mod event;
pub mod input;
pub mod native;
pub mod runtime;
pub mod time;

pub mod logging;
