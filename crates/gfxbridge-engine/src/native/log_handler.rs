use super::callbacks::{CallbackHandler, FatalKind};

/// Log target used for renderer-originated messages.
pub const NATIVE_TARGET: &str = "native";

/// Routes renderer reports into the `log` facade.
///
/// Never terminates the process; wrap it when a non-recoverable report should
/// end the application.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogHandler;

impl CallbackHandler for LogHandler {
    fn report_error(&self, kind: FatalKind, message: &str) {
        if kind.is_recoverable() {
            log::warn!(target: NATIVE_TARGET, "{kind}: {message}");
        } else {
            log::error!(target: NATIVE_TARGET, "{kind}: {message}");
        }
    }

    fn report_debug(&self, file: &str, line: u16, message: &str) {
        log::debug!(target: NATIVE_TARGET, "{file}:{line}: {message}");
    }
}
