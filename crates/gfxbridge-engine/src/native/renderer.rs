use std::ffi::c_int;

use super::ffi::render_frame;

/// Status reported by one native frame tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderFrame {
    /// A frame was rendered (or the tick timed out); keep going.
    Continue,
    /// The renderer is shutting down; keep ticking until `NoContext`.
    Exiting,
    /// No context left: the renderer has released its threads and resources.
    NoContext,
}

/// The native renderer as seen by the render loop.
pub trait NativeRenderer {
    /// Renders one frame and reports status.
    fn render_frame(&mut self) -> RenderFrame;

    /// Called once when the loop stops dispatching, before the draining ticks.
    fn begin_shutdown(&mut self) {}

    /// Called for every drained `Resize` event.
    fn resize(&mut self, width: u16, height: u16) {
        let _ = (width, height);
    }
}

impl<T: NativeRenderer + ?Sized> NativeRenderer for Box<T> {
    fn render_frame(&mut self) -> RenderFrame {
        (**self).render_frame()
    }

    fn begin_shutdown(&mut self) {
        (**self).begin_shutdown();
    }

    fn resize(&mut self, width: u16, height: u16) {
        (**self).resize(width, height);
    }
}

impl RenderFrame {
    /// Maps a raw `bgfx_render_frame_t`. A timed-out tick counts as `Continue`.
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            render_frame::NO_CONTEXT => RenderFrame::NoContext,
            render_frame::EXITING => RenderFrame::Exiting,
            _ => RenderFrame::Continue,
        }
    }
}
