//! Logger initialization.
//!
//! Everything logs through the `log` facade; this only installs `env_logger`
//! with a separate default level for native renderer output.

mod init;

pub use init::{init_logging, LoggingConfig};
