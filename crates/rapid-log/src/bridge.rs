use crate::event::{Caller, Level};
use crate::logger;

use log::{LevelFilter, Metadata, Record};

static BRIDGE: LogBridge = LogBridge;

/// `log` facade backend that forwards records from dependencies into the
/// process-wide logger, so library logging lands in both sinks too.
struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        logger::get().is_some()
    }

    fn log(&self, record: &Record) {
        let Some(active) = logger::get() else {
            return;
        };

        let caller = match (record.file_static(), record.line()) {
            (Some(file), Some(line)) => Some(Caller { file, line }),
            _ => None,
        };

        active.emit_bridge(
            level_from(record.level()),
            record.args().to_string(),
            caller,
        );
    }

    fn flush(&self) {}
}

fn level_from(level: log::Level) -> Level {
    match level {
        log::Level::Trace | log::Level::Debug => Level::Debug,
        log::Level::Info => Level::Info,
        log::Level::Warn => Level::Warn,
        log::Level::Error => Level::Error,
    }
}

/// Install the bridge as the global `log` backend. Fails if another backend
/// was installed first; callable once per process.
pub fn install_log_bridge(max_level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(max_level);
    Ok(())
}
