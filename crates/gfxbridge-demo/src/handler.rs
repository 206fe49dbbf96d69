use gfxbridge_engine::native::{CallbackHandler, FatalKind, LogHandler};

/// Logs renderer reports and terminates the process on non-recoverable ones.
#[derive(Debug, Default)]
pub struct DemoHandler {
    log: LogHandler,
}

impl CallbackHandler for DemoHandler {
    fn report_error(&self, kind: FatalKind, message: &str) {
        self.log.report_error(kind, message);

        if !kind.is_recoverable() {
            log::error!("native renderer is unusable after {kind}; terminating");
            std::process::exit(1);
        }
    }

    fn report_debug(&self, file: &str, line: u16, message: &str) {
        self.log.report_debug(file, line, message);
    }
}
