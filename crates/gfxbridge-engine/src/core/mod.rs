//! Contract between the render loop and the application it drives.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use crate::time::FrameTime;
