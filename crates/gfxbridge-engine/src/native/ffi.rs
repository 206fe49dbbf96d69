//! C ABI mirror of the renderer's callback interface.
//!
//! Layouts follow `bgfx_callback_interface_t` / `bgfx_callback_vtbl_t` from the
//! C99 header. Slots are plain function pointers: every table built by this
//! crate fills all of them.

use std::ffi::{c_char, c_int, c_void};

/// `va_list` as received by a callback.
///
/// Every supported ABI hands a `va_list` argument to the callee as a pointer
/// (array decay on x86_64 SysV, indirect composite on AArch64, `char*` elsewhere).
pub type VaList = *mut c_void;

/// Object the native side calls through. `vtbl` must stay valid while the
/// renderer holds the interface.
#[repr(C)]
#[derive(Debug)]
pub struct CallbackInterface {
    pub vtbl: *const CallbackVtbl,
}

pub type FatalFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    file_path: *const c_char,
    line: u16,
    code: c_int,
    message: *const c_char,
);

pub type TraceVargsFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    file_path: *const c_char,
    line: u16,
    format: *const c_char,
    args: VaList,
);

pub type ProfilerBeginFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    name: *const c_char,
    abgr: u32,
    file_path: *const c_char,
    line: u16,
);

pub type ProfilerEndFn = unsafe extern "C" fn(this: *mut CallbackInterface);

pub type CacheReadSizeFn = unsafe extern "C" fn(this: *mut CallbackInterface, id: u64) -> u32;

pub type CacheReadFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    id: u64,
    data: *mut c_void,
    size: u32,
) -> bool;

pub type CacheWriteFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    id: u64,
    data: *const c_void,
    size: u32,
);

pub type ScreenShotFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    file_path: *const c_char,
    width: u32,
    height: u32,
    pitch: u32,
    data: *const c_void,
    size: u32,
    yflip: bool,
);

pub type CaptureBeginFn = unsafe extern "C" fn(
    this: *mut CallbackInterface,
    width: u32,
    height: u32,
    pitch: u32,
    format: c_int,
    yflip: bool,
);

pub type CaptureEndFn = unsafe extern "C" fn(this: *mut CallbackInterface);

pub type CaptureFrameFn =
    unsafe extern "C" fn(this: *mut CallbackInterface, data: *const c_void, size: u32);

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct CallbackVtbl {
    pub fatal: FatalFn,
    pub trace_vargs: TraceVargsFn,
    pub profiler_begin: ProfilerBeginFn,
    pub profiler_begin_literal: ProfilerBeginFn,
    pub profiler_end: ProfilerEndFn,
    pub cache_read_size: CacheReadSizeFn,
    pub cache_read: CacheReadFn,
    pub cache_write: CacheWriteFn,
    pub screen_shot: ScreenShotFn,
    pub capture_begin: CaptureBeginFn,
    pub capture_end: CaptureEndFn,
    pub capture_frame: CaptureFrameFn,
}

/// `bgfx_fatal_t` values.
pub mod fatal {
    use std::ffi::c_int;

    pub const DEBUG_CHECK: c_int = 0;
    pub const INVALID_SHADER: c_int = 1;
    pub const UNABLE_TO_INITIALIZE: c_int = 2;
    pub const UNABLE_TO_CREATE_TEXTURE: c_int = 3;
    pub const DEVICE_LOST: c_int = 4;
}

/// `bgfx_render_frame_t` values.
pub mod render_frame {
    use std::ffi::c_int;

    pub const NO_CONTEXT: c_int = 0;
    pub const RENDER: c_int = 1;
    pub const TIMEOUT: c_int = 2;
    pub const EXITING: c_int = 3;
}
