//! Dual-sink structured logger: every event is rendered compactly (and
//! optionally colorized) to the console and verbosely to a date-named,
//! size/age/backup-bounded rotating file.

mod bridge;
mod error;
mod event;
mod file_sink;
mod formatter;
mod logger;
mod logger_config;
mod rotation;
mod sink;
mod watcher;
mod writer_pool;

#[cfg(test)]
mod tests;

pub use bridge::install_log_bridge;
pub use error::{LogError, LogErrorResult};
pub use event::{Caller, Context, Level, LogEvent, UNKNOWN_ID, context_from};
pub use file_sink::{FileSinkManager, RotatingFileSink};
pub use formatter::Formatter;
pub use logger::{
    Logger, debug, debug_with, error, error_with, fatal, fatal_with, get, info, info_with, init,
    register_rotation_callback, shutdown, warn, warn_with,
};
pub use logger_config::LoggerConfig;
pub use rotation::{RotationCallback, RotationCallbacks};
pub use sink::{ConsoleSink, Sink};
pub use writer_pool::WriterPool;
