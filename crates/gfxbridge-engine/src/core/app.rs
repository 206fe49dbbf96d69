use crate::event::Event;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract, driven on the render thread.
pub trait App {
    /// Called for every drained event, in queue order, before the frame.
    fn on_event(&mut self, event: &Event) {
        let _ = event;
    }

    /// Called once per frame, before the native tick.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
