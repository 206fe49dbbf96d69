use std::borrow::Cow;
use std::ffi::{c_char, c_int, c_void, CStr};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::{self, NonNull};

use super::ffi::{fatal, CallbackInterface, CallbackVtbl, VaList};
use super::log_handler::NATIVE_TARGET;

/// Kind of a fatal report raised by the renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FatalKind {
    /// Advisory; the renderer keeps running.
    DebugCheck,
    InvalidShader,
    UnableToInitialize,
    UnableToCreateTexture,
    DeviceLost,
    /// Code outside the known set.
    Unknown(i32),
}

impl FatalKind {
    pub fn from_raw(code: c_int) -> Self {
        match code {
            fatal::DEBUG_CHECK => FatalKind::DebugCheck,
            fatal::INVALID_SHADER => FatalKind::InvalidShader,
            fatal::UNABLE_TO_INITIALIZE => FatalKind::UnableToInitialize,
            fatal::UNABLE_TO_CREATE_TEXTURE => FatalKind::UnableToCreateTexture,
            fatal::DEVICE_LOST => FatalKind::DeviceLost,
            other => FatalKind::Unknown(other),
        }
    }

    /// Only debug checks leave the renderer usable. After any other kind the
    /// embedding application is expected to terminate.
    pub fn is_recoverable(self) -> bool {
        self == FatalKind::DebugCheck
    }
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalKind::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Receiver for renderer-originated reports.
///
/// Both methods may be called from any thread, including renderer worker
/// threads the host never created, and must not block for long: the calling
/// native thread is stalled until they return. Deciding whether to terminate
/// after a non-recoverable [`FatalKind`] is up to the implementation.
pub trait CallbackHandler: Send + Sync {
    fn report_error(&self, kind: FatalKind, message: &str);

    fn report_debug(&self, file: &str, line: u16, message: &str);
}

/// Heap block handed to the renderer.
///
/// `interface` is the first field so the `this` pointer the renderer passes
/// back can be cast to the whole table.
#[repr(C)]
struct CallbackTable {
    interface: CallbackInterface,
    vtbl: CallbackVtbl,
    handler: Box<dyn CallbackHandler>,
}

const VTBL: CallbackVtbl = CallbackVtbl {
    fatal: fatal_trampoline,
    trace_vargs: trace_trampoline,
    profiler_begin: profiler_begin_noop,
    profiler_begin_literal: profiler_begin_noop,
    profiler_end: interface_noop,
    cache_read_size: cache_read_size_miss,
    cache_read: cache_read_miss,
    cache_write: cache_write_noop,
    screen_shot: screen_shot_noop,
    capture_begin: capture_begin_noop,
    capture_end: interface_noop,
    capture_frame: capture_frame_noop,
};

/// Sole owner of one `CallbackTable` allocation. Dropping it frees the table.
struct OwnedTable(NonNull<CallbackTable>);

impl OwnedTable {
    fn new(handler: Box<dyn CallbackHandler>) -> Self {
        let raw = Box::into_raw(Box::new(CallbackTable {
            interface: CallbackInterface { vtbl: ptr::null() },
            vtbl: VTBL,
            handler,
        }));

        // SAFETY: `raw` is a fresh allocation owned by nobody else yet.
        // The vtable lives inside the same block, so the pointer stays valid
        // for as long as the table does.
        unsafe {
            (*raw).interface.vtbl = ptr::addr_of!((*raw).vtbl);
            Self(NonNull::new_unchecked(raw))
        }
    }

    fn interface(&self) -> NonNull<CallbackInterface> {
        self.0.cast()
    }
}

impl Drop for OwnedTable {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `Box::into_raw` in `new` and this is
        // the only place it is released.
        drop(unsafe { Box::from_raw(self.0.as_ptr()) });
    }
}

// SAFETY: after construction the table is only read, and the handler inside
// is `Send + Sync`.
unsafe impl Send for OwnedTable {}

/// Owns the callback interface the renderer calls into.
///
/// At most one handler is installed at a time. Installing replaces and frees
/// the previous table; [`uninstall`](Self::uninstall) and drop free the current
/// one. Setup and teardown are driven from a single controlling thread.
///
/// The renderer must stop using an interface before it is retired: shut the
/// renderer down (or otherwise guarantee no further calls) before replacing,
/// uninstalling or dropping the bridge.
#[derive(Default)]
pub struct CallbackBridge {
    installed: Option<OwnedTable>,
}

impl CallbackBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler`, retiring any previous one, and returns the
    /// interface pointer to pass to the renderer.
    pub fn install<H>(&mut self, handler: H) -> NonNull<CallbackInterface>
    where
        H: CallbackHandler + 'static,
    {
        self.uninstall();

        let table = OwnedTable::new(Box::new(handler));
        let interface = table.interface();
        self.installed = Some(table);

        log::debug!("callback table installed at {:p}", interface);
        interface
    }

    /// Frees the installed table, if any.
    pub fn uninstall(&mut self) {
        if let Some(table) = self.installed.take() {
            log::debug!("callback table at {:p} released", table.interface());
        }
    }

    /// Interface of the installed table.
    pub fn interface(&self) -> Option<NonNull<CallbackInterface>> {
        self.installed.as_ref().map(OwnedTable::interface)
    }

    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }
}

impl fmt::Debug for CallbackBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackBridge")
            .field("interface", &self.interface())
            .finish()
    }
}

// ── trampolines ──────────────────────────────────────────────────────────────

/// Size of the stack buffer trace messages are formatted into.
const TRACE_BUFFER_LEN: usize = 1024;

#[cfg(unix)]
unsafe extern "C" {
    fn vsnprintf(buf: *mut c_char, len: usize, format: *const c_char, args: VaList) -> c_int;
}

/// # Safety
/// `this` must be an interface returned by [`CallbackBridge::install`] whose
/// table has not been released.
unsafe fn table<'a>(this: *mut CallbackInterface) -> &'a CallbackTable {
    unsafe { &*this.cast::<CallbackTable>() }
}

/// # Safety
/// `ptr` must be null or a NUL-terminated string valid for `'a`.
unsafe fn c_str<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("")
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}

/// Formats `format` with `args` into `buf`. Falls back to the raw format
/// string when there is no argument list or no C formatter.
///
/// # Safety
/// `format` must be null or NUL-terminated; `args` must be null or a live
/// `va_list` matching `format`, consumed at most once.
#[cfg_attr(not(unix), allow(unused_variables))]
unsafe fn format_trace<'a>(
    buf: &'a mut [c_char; TRACE_BUFFER_LEN],
    format: *const c_char,
    args: VaList,
) -> Cow<'a, str> {
    if format.is_null() {
        return Cow::Borrowed("");
    }

    #[cfg(unix)]
    if !args.is_null() {
        // vsnprintf truncates and always NUL-terminates within `len`.
        let written = unsafe { vsnprintf(buf.as_mut_ptr(), buf.len(), format, args) };
        if written >= 0 {
            return unsafe { CStr::from_ptr(buf.as_ptr()) }.to_string_lossy();
        }
    }

    unsafe { CStr::from_ptr(format) }.to_string_lossy()
}

/// Runs a handler call, containing any panic at the C boundary.
fn guarded(slot: &str, f: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        log::error!("callback handler panicked in `{slot}`");
    }
}

unsafe extern "C" fn fatal_trampoline(
    this: *mut CallbackInterface,
    file_path: *const c_char,
    line: u16,
    code: c_int,
    message: *const c_char,
) {
    let table = unsafe { table(this) };
    let kind = FatalKind::from_raw(code);
    let file = unsafe { c_str(file_path) };
    let message = unsafe { c_str(message) };

    log::debug!(target: NATIVE_TARGET, "{kind} raised at {file}:{line}");
    guarded("fatal", || table.handler.report_error(kind, &message));
}

unsafe extern "C" fn trace_trampoline(
    this: *mut CallbackInterface,
    file_path: *const c_char,
    line: u16,
    format: *const c_char,
    args: VaList,
) {
    let table = unsafe { table(this) };
    let file = unsafe { c_str(file_path) };

    let mut buf = [0 as c_char; TRACE_BUFFER_LEN];
    let message = unsafe { format_trace(&mut buf, format, args) };
    let message = message.trim_end_matches(['\r', '\n']);

    guarded("trace", || table.handler.report_debug(&file, line, message));
}

unsafe extern "C" fn interface_noop(_this: *mut CallbackInterface) {}

unsafe extern "C" fn profiler_begin_noop(
    _this: *mut CallbackInterface,
    _name: *const c_char,
    _abgr: u32,
    _file_path: *const c_char,
    _line: u16,
) {
}

/// No shader cache: every lookup misses.
unsafe extern "C" fn cache_read_size_miss(_this: *mut CallbackInterface, _id: u64) -> u32 {
    0
}

unsafe extern "C" fn cache_read_miss(
    _this: *mut CallbackInterface,
    _id: u64,
    _data: *mut c_void,
    _size: u32,
) -> bool {
    false
}

unsafe extern "C" fn cache_write_noop(
    _this: *mut CallbackInterface,
    _id: u64,
    _data: *const c_void,
    _size: u32,
) {
}

unsafe extern "C" fn screen_shot_noop(
    _this: *mut CallbackInterface,
    _file_path: *const c_char,
    _width: u32,
    _height: u32,
    _pitch: u32,
    _data: *const c_void,
    _size: u32,
    _yflip: bool,
) {
}

unsafe extern "C" fn capture_begin_noop(
    _this: *mut CallbackInterface,
    _width: u32,
    _height: u32,
    _pitch: u32,
    _format: c_int,
    _yflip: bool,
) {
}

unsafe extern "C" fn capture_frame_noop(
    _this: *mut CallbackInterface,
    _data: *const c_void,
    _size: u32,
) {
}
