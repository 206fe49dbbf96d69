//! Binding to the real renderer library (`libbgfx`).
//!
//! Only the entry points with ordering, lifetime or threading concerns of
//! their own are declared here.

use std::ffi::{c_int, c_void};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr;

use anyhow::{Context, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};

use super::callbacks::{CallbackBridge, CallbackHandler};
use super::ffi::CallbackInterface;
use super::renderer::{NativeRenderer, RenderFrame};
use super::resource::{NativeHandle, NativeResource};

mod sys {
    use std::ffi::{c_int, c_void};

    use super::super::ffi::CallbackInterface;

    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct PlatformData {
        pub ndt: *mut c_void,
        pub nwh: *mut c_void,
        pub context: *mut c_void,
        pub back_buffer: *mut c_void,
        pub back_buffer_ds: *mut c_void,
        pub kind: c_int,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct Resolution {
        pub format: c_int,
        pub width: u32,
        pub height: u32,
        pub reset: u32,
        pub num_back_buffers: u8,
        pub max_frame_latency: u8,
        pub debug_text_scale: u8,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct InitLimits {
        pub max_encoders: u16,
        pub min_resource_cb_size: u32,
        pub transient_vb_size: u32,
        pub transient_ib_size: u32,
    }

    #[repr(C)]
    #[derive(Copy, Clone)]
    pub struct Init {
        pub renderer: c_int,
        pub vendor_id: u16,
        pub device_id: u16,
        pub capabilities: u64,
        pub debug: bool,
        pub profile: bool,
        pub platform_data: PlatformData,
        pub resolution: Resolution,
        pub limits: InitLimits,
        pub callback: *mut CallbackInterface,
        pub allocator: *mut c_void,
    }

    #[repr(C)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct OcclusionQueryHandle {
        pub idx: u16,
    }

    #[link(name = "bgfx")]
    unsafe extern "C" {
        pub fn bgfx_init_ctor(init: *mut Init);
        pub fn bgfx_init(init: *const Init) -> bool;
        pub fn bgfx_shutdown();
        pub fn bgfx_reset(width: u32, height: u32, flags: u32, format: c_int);
        pub fn bgfx_frame(capture: bool) -> u32;
        pub fn bgfx_render_frame(msecs: i32) -> c_int;

        pub fn bgfx_create_occlusion_query() -> OcclusionQueryHandle;
        pub fn bgfx_destroy_occlusion_query(handle: OcclusionQueryHandle);
        pub fn bgfx_get_result(handle: OcclusionQueryHandle, result: *mut i32) -> c_int;
        pub fn bgfx_set_condition(handle: OcclusionQueryHandle, visible: bool);
    }
}

const RESET_VSYNC: u32 = 0x0000_0080;
const NATIVE_WINDOW_HANDLE_DEFAULT: c_int = 0;
const NATIVE_WINDOW_HANDLE_WAYLAND: c_int = 1;

/// Window and display handles for the renderer.
#[derive(Copy, Clone)]
pub struct PlatformData(sys::PlatformData);

// SAFETY: the handles are opaque identifiers; the renderer, not this type,
// decides which thread dereferences them.
unsafe impl Send for PlatformData {}

impl PlatformData {
    pub fn from_window<W>(window: &W) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle,
    {
        let window_handle = window
            .window_handle()
            .context("window handle unavailable")?
            .as_raw();

        let (nwh, kind) = match window_handle {
            RawWindowHandle::AppKit(h) => (h.ns_view.as_ptr(), NATIVE_WINDOW_HANDLE_DEFAULT),
            RawWindowHandle::Win32(h) => {
                (h.hwnd.get() as *mut c_void, NATIVE_WINDOW_HANDLE_DEFAULT)
            }
            RawWindowHandle::Xlib(h) => {
                (h.window as usize as *mut c_void, NATIVE_WINDOW_HANDLE_DEFAULT)
            }
            RawWindowHandle::Xcb(h) => {
                (h.window.get() as usize as *mut c_void, NATIVE_WINDOW_HANDLE_DEFAULT)
            }
            RawWindowHandle::Wayland(h) => (h.surface.as_ptr(), NATIVE_WINDOW_HANDLE_WAYLAND),
            other => anyhow::bail!("unsupported window handle {other:?}"),
        };

        let ndt = match window
            .display_handle()
            .context("display handle unavailable")?
            .as_raw()
        {
            RawDisplayHandle::Xlib(h) => h.display.map_or(ptr::null_mut(), |d| d.as_ptr()),
            RawDisplayHandle::Xcb(h) => h.connection.map_or(ptr::null_mut(), |c| c.as_ptr()),
            RawDisplayHandle::Wayland(h) => h.display.as_ptr(),
            _ => ptr::null_mut(),
        };

        Ok(Self(sys::PlatformData {
            ndt,
            nwh,
            context: ptr::null_mut(),
            back_buffer: ptr::null_mut(),
            back_buffer_ds: ptr::null_mut(),
            kind,
        }))
    }
}

enum Phase {
    Pending,
    Running,
    ShuttingDown,
    Down,
}

/// The real renderer driven in single-threaded mode from the render loop.
///
/// Initialization is deferred to the first tick so that it happens on the
/// render thread. `Drop` shuts the renderer down before the bridge frees the
/// callback table.
pub struct BgfxRenderer {
    phase: Phase,
    platform: PlatformData,
    width: u32,
    height: u32,
    format: c_int,
    bridge: CallbackBridge,
    callbacks: *mut CallbackInterface,
}

// SAFETY: `callbacks` points into the table owned by `bridge`, which moves
// with the renderer.
unsafe impl Send for BgfxRenderer {}

impl BgfxRenderer {
    pub fn new<H>(platform: PlatformData, width: u32, height: u32, handler: H) -> Self
    where
        H: CallbackHandler + 'static,
    {
        let mut bridge = CallbackBridge::new();
        let callbacks = bridge.install(handler).as_ptr();
        Self {
            phase: Phase::Pending,
            platform,
            width,
            height,
            format: 0,
            bridge,
            callbacks,
        }
    }

    fn init(&mut self) -> bool {
        let mut init = MaybeUninit::<sys::Init>::uninit();
        // SAFETY: `bgfx_init_ctor` fully initializes the struct. Calling
        // `bgfx_render_frame` before `bgfx_init` selects single-threaded mode
        // on this thread. The callback interface outlives the renderer: it is
        // released by `bridge` only after `bgfx_shutdown` in `Drop`.
        unsafe {
            sys::bgfx_init_ctor(init.as_mut_ptr());
            let mut init = init.assume_init();
            init.platform_data = self.platform.0;
            init.resolution.width = self.width;
            init.resolution.height = self.height;
            init.resolution.reset = RESET_VSYNC;
            init.callback = self.callbacks;
            self.format = init.resolution.format;

            let status = RenderFrame::from_raw(sys::bgfx_render_frame(-1));
            log::debug!("pre-init render tick: {status:?}");
            sys::bgfx_init(&init)
        }
    }

    fn shutdown_now(&mut self) {
        if matches!(self.phase, Phase::Running | Phase::ShuttingDown) {
            // SAFETY: the renderer was initialized on this thread and is shut down once.
            unsafe { sys::bgfx_shutdown() };
            log::info!("renderer shut down");
        }
        self.phase = Phase::Down;
    }
}

impl NativeRenderer for BgfxRenderer {
    fn render_frame(&mut self) -> RenderFrame {
        match self.phase {
            Phase::Pending => {
                if self.init() {
                    log::info!("renderer initialized at {}x{}", self.width, self.height);
                    self.phase = Phase::Running;
                } else {
                    log::error!("renderer initialization failed");
                    self.phase = Phase::Down;
                    return RenderFrame::NoContext;
                }
                RenderFrame::Continue
            }
            Phase::Running => {
                // SAFETY: initialized in single-threaded mode on this thread, so
                // `bgfx_frame` also performs the render side of the frame.
                unsafe { sys::bgfx_frame(false) };
                RenderFrame::Continue
            }
            Phase::ShuttingDown => {
                self.shutdown_now();
                RenderFrame::NoContext
            }
            Phase::Down => RenderFrame::NoContext,
        }
    }

    fn begin_shutdown(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::ShuttingDown,
            Phase::Pending | Phase::ShuttingDown | Phase::Down => Phase::Down,
        };
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = u32::from(width);
        self.height = u32::from(height);
        if matches!(self.phase, Phase::Running) {
            // SAFETY: initialized; `format` was read back from the init defaults.
            unsafe { sys::bgfx_reset(self.width, self.height, RESET_VSYNC, self.format) };
        }
    }
}

impl Drop for BgfxRenderer {
    fn drop(&mut self) {
        self.shutdown_now();
        self.bridge.uninstall();
    }
}

// ── occlusion queries ────────────────────────────────────────────────────────

/// Occlusion query handle. Bound to the thread that drives the renderer.
#[derive(Copy, Clone, Debug)]
pub struct OcclusionQueryHandle {
    raw: sys::OcclusionQueryHandle,
    _not_send: PhantomData<*const ()>,
}

// SAFETY: `bgfx_create_occlusion_query` hands out a fresh handle per call.
unsafe impl NativeHandle for OcclusionQueryHandle {
    const KIND: &'static str = "occlusion query";

    fn create() -> Self {
        // SAFETY: called on the renderer thread after initialization.
        let raw = unsafe { sys::bgfx_create_occlusion_query() };
        Self { raw, _not_send: PhantomData }
    }

    unsafe fn destroy(self) {
        unsafe { sys::bgfx_destroy_occlusion_query(self.raw) };
    }
}

/// Result of an occlusion query.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OcclusionResult {
    Invisible,
    /// Visible, with the number of passing samples.
    Visible(i32),
    /// Result not available yet.
    NoResult,
}

pub type OcclusionQuery = NativeResource<OcclusionQueryHandle>;

impl NativeResource<OcclusionQueryHandle> {
    pub fn result(&self) -> OcclusionResult {
        let mut samples = 0i32;
        // SAFETY: the handle is live for as long as `self`.
        match unsafe { sys::bgfx_get_result(self.handle().raw, &mut samples) } {
            0 => OcclusionResult::Invisible,
            1 => OcclusionResult::Visible(samples),
            _ => OcclusionResult::NoResult,
        }
    }

    /// Makes subsequent draw calls conditional on this query's visibility.
    pub fn set_condition(&self, visible: bool) {
        // SAFETY: the handle is live for as long as `self`.
        unsafe { sys::bgfx_set_condition(self.handle().raw, visible) };
    }
}
