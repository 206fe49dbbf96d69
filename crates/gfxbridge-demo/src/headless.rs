//! Stand-in renderer for builds without the native library.
//!
//! Paces itself like a vsynced renderer and reports through the same C
//! callback table a native renderer would use.

use std::ffi::{CStr, CString};
use std::ptr;
use std::thread;
use std::time::Duration;

use gfxbridge_engine::native::{CallbackBridge, CallbackHandler, NativeRenderer, RenderFrame};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Ticks reported as `Exiting` after shutdown begins.
const SHUTDOWN_TICKS: u32 = 3;

/// Frames between heartbeat traces.
const HEARTBEAT_FRAMES: u64 = 600;

pub struct HeadlessRenderer {
    bridge: CallbackBridge,
    frame: u64,
    size: (u16, u16),
    draining: Option<u32>,
}

impl HeadlessRenderer {
    pub fn new<H>(handler: H) -> Self
    where
        H: CallbackHandler + 'static,
    {
        let mut bridge = CallbackBridge::new();
        bridge.install(handler);

        let renderer = Self {
            bridge,
            frame: 0,
            size: (0, 0),
            draining: None,
        };
        renderer.trace_static(c"headless renderer created");
        renderer
    }

    fn trace(&self, message: String) {
        match CString::new(message) {
            Ok(message) => self.trace_static(&message),
            Err(e) => log::warn!("dropping trace with interior NUL: {e}"),
        }
    }

    /// Calls the installed trace slot exactly as the native side would.
    fn trace_static(&self, message: &CStr) {
        let Some(interface) = self.bridge.interface() else {
            return;
        };
        let this = interface.as_ptr();

        // SAFETY: the interface is live while `bridge` holds it, and a null
        // argument list makes the slot forward `message` unformatted.
        unsafe {
            let vtbl = *(*this).vtbl;
            (vtbl.trace_vargs)(
                this,
                c"headless.rs".as_ptr(),
                line!() as u16,
                message.as_ptr(),
                ptr::null_mut(),
            );
        }
    }
}

impl NativeRenderer for HeadlessRenderer {
    fn render_frame(&mut self) -> RenderFrame {
        if let Some(remaining) = self.draining {
            if remaining == 0 {
                self.trace_static(c"headless renderer released");
                self.bridge.uninstall();
                return RenderFrame::NoContext;
            }
            self.draining = Some(remaining - 1);
            return RenderFrame::Exiting;
        }

        thread::sleep(FRAME_INTERVAL);
        self.frame += 1;

        if self.frame % HEARTBEAT_FRAMES == 0 {
            self.trace(format!("frame {} at {}x{}", self.frame, self.size.0, self.size.1));
        }
        RenderFrame::Continue
    }

    fn begin_shutdown(&mut self) {
        self.trace(format!("shutdown requested after {} frame(s)", self.frame));
        if self.draining.is_none() {
            self.draining = Some(SHUTDOWN_TICKS);
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.trace(format!("backbuffer resized to {width}x{height}"));
    }
}
