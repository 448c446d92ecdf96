use crate::error::{LogError, LogErrorResult};
use crate::event::{Caller, Context, Level, LogEvent};
use crate::rotation::RotationCallbacks;
use crate::sink::ConsoleSink;
use crate::{LoggerConfig, RotatingFileSink, Sink, watcher};

use std::panic::Location;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

type ExitHook = Box<dyn Fn(i32) + Send + Sync>;

struct Inner {
    config: LoggerConfig,
    console: Arc<ConsoleSink>,
    file: Arc<RotatingFileSink>,
    sinks: Vec<Arc<dyn Sink>>,
    callbacks: RotationCallbacks,
    shutdown_tx: watch::Sender<bool>,
    watcher: Mutex<Option<JoinHandle<()>>>,
    open: AtomicBool,
    exit_hook: Mutex<ExitHook>,
}

/// Handle to one dual-sink logger. Cheap to clone; all clones share the
/// sinks, the rotation state, and the shutdown flag.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    /// Open both sinks and start the day-boundary watcher.
    ///
    /// The watcher needs a tokio runtime; without one (plain sync code,
    /// most tests) rotation still works through `rotate()` and
    /// `rotate_if_date_changed()`.
    pub fn init(config: LoggerConfig) -> LogErrorResult<Logger> {
        let console = Arc::new(ConsoleSink::new(config.colored));
        let file = Arc::new(RotatingFileSink::open(&config)?);
        let sinks: Vec<Arc<dyn Sink>> = vec![console.clone(), file.clone()];

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let logger = Logger {
            inner: Arc::new(Inner {
                config,
                console,
                file,
                sinks,
                callbacks: RotationCallbacks::new(),
                shutdown_tx,
                watcher: Mutex::new(None),
                open: AtomicBool::new(true),
                exit_hook: Mutex::new(Box::new(|code| std::process::exit(code))),
            }),
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            let handle = watcher::spawn(logger.clone(), shutdown_rx);
            *logger.inner.watcher.lock().unwrap() = Some(handle);
        }

        Ok(logger)
    }

    #[track_caller]
    pub fn debug<M: Into<String>>(&self, message: M) {
        self.log(Level::Debug, message.into(), Context::new());
    }

    #[track_caller]
    pub fn debug_with<M: Into<String>>(&self, message: M, context: Context) {
        self.log(Level::Debug, message.into(), context);
    }

    #[track_caller]
    pub fn info<M: Into<String>>(&self, message: M) {
        self.log(Level::Info, message.into(), Context::new());
    }

    #[track_caller]
    pub fn info_with<M: Into<String>>(&self, message: M, context: Context) {
        self.log(Level::Info, message.into(), context);
    }

    #[track_caller]
    pub fn warn<M: Into<String>>(&self, message: M) {
        self.log(Level::Warn, message.into(), Context::new());
    }

    #[track_caller]
    pub fn warn_with<M: Into<String>>(&self, message: M, context: Context) {
        self.log(Level::Warn, message.into(), context);
    }

    #[track_caller]
    pub fn error<M: Into<String>>(&self, message: M) {
        self.log(Level::Error, message.into(), Context::new());
    }

    #[track_caller]
    pub fn error_with<M: Into<String>>(&self, message: M, context: Context) {
        self.log(Level::Error, message.into(), context);
    }

    /// Emit at fatal level, flush the file sink, then run the exit hook.
    /// The default hook exits the process with code 1.
    #[track_caller]
    pub fn fatal<M: Into<String>>(&self, message: M) {
        self.log(Level::Fatal, message.into(), Context::new());
    }

    #[track_caller]
    pub fn fatal_with<M: Into<String>>(&self, message: M, context: Context) {
        self.log(Level::Fatal, message.into(), context);
    }

    #[track_caller]
    fn log(&self, level: Level, message: String, context: Context) {
        let caller = Caller::from(Location::caller());
        self.emit(level, message, context, Some(caller));
    }

    /// Fan the event out to every sink. Sink failures never reach the
    /// caller; they get a best-effort stderr notice instead.
    fn emit(&self, level: Level, message: String, context: Context, caller: Option<Caller>) {
        if !self.inner.open.load(Ordering::Acquire) {
            // shut down: events are dropped silently
            return;
        }
        if level < self.inner.config.min_level {
            return;
        }

        let event = LogEvent::new(level, message, context, caller);
        for sink in &self.inner.sinks {
            if let Err(e) = sink.emit(&event) {
                eprintln!("log sink write failed: {e}");
            }
        }

        if level == Level::Fatal {
            let _ = self.inner.file.flush();
            let hook = self.inner.exit_hook.lock().unwrap();
            (hook)(1);
        }
    }

    /// Emission path for the `log` facade bridge: caller comes from the
    /// record instead of `#[track_caller]`.
    pub(crate) fn emit_bridge(&self, level: Level, message: String, caller: Option<Caller>) {
        self.emit(level, message, Context::new(), caller);
    }

    /// Register a callback fired after each rotation, in registration order.
    pub fn register_rotation_callback<F: Fn() + Send + Sync + 'static>(&self, callback: F) {
        self.inner.callbacks.register(callback);
    }

    /// Force a rotation now, firing registered callbacks.
    pub fn rotate(&self) -> LogErrorResult<()> {
        self.inner.file.manager().rotate()?;
        self.inner.callbacks.fire_all();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn rotate_to_date(&self, date: &str) -> LogErrorResult<()> {
        self.inner.file.manager().rotate_to_date(date)?;
        self.inner.callbacks.fire_all();
        Ok(())
    }

    /// Day-boundary rotation. Failures are reported through the console
    /// sink only, so a broken file sink is never fed its own error.
    pub fn rotate_if_date_changed(&self) {
        match self.inner.file.manager().rotate_if_date_changed() {
            Ok(true) => self.inner.callbacks.fire_all(),
            Ok(false) => {}
            Err(e) => self.console_only(Level::Error, format!("log rotation failed: {e}")),
        }
    }

    fn console_only(&self, level: Level, message: String) {
        let event = LogEvent::new(level, message, Context::new(), None);
        let _ = self.inner.console.emit(&event);
    }

    /// Stop the watcher, flush pending writes, and close the file handle.
    /// Safe to call more than once; leveled calls afterwards are dropped.
    pub fn shutdown(&self) -> LogErrorResult<()> {
        if !self.inner.open.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        let _ = self.inner.shutdown_tx.send(true);
        self.inner
            .file
            .manager()
            .close()
            .map_err(|e| LogError::io(&self.inner.config.dir, e))
    }

    /// Replace the fatal exit hook. Tests substitute a recording hook.
    pub fn set_exit_hook<F: Fn(i32) + Send + Sync + 'static>(&self, hook: F) {
        *self.inner.exit_hook.lock().unwrap() = Box::new(hook);
    }

    /// Path of the active log file, None after shutdown.
    pub fn current_log_path(&self) -> Option<PathBuf> {
        self.inner.file.manager().current_path()
    }
}

// ---------------------------------------------------------------------------
// Process-wide front: one active logger per process, init-twice rejected.
// ---------------------------------------------------------------------------

static GLOBAL: Mutex<Option<Logger>> = Mutex::new(None);

/// Initialize the process-wide logger. A second call while the first logger
/// is still active fails without touching the active one; after a
/// `shutdown()` the slot is free again.
pub fn init(config: LoggerConfig) -> LogErrorResult<Logger> {
    let mut slot = GLOBAL.lock().unwrap();
    if slot.is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let logger = Logger::init(config)?;
    *slot = Some(logger.clone());
    Ok(logger)
}

/// The process-wide logger, if initialized.
pub fn get() -> Option<Logger> {
    GLOBAL.lock().unwrap().clone()
}

/// Shut the process-wide logger down. No-op when never initialized.
pub fn shutdown() -> LogErrorResult<()> {
    let taken = GLOBAL.lock().unwrap().take();
    match taken {
        Some(logger) => logger.shutdown(),
        None => Ok(()),
    }
}

/// Register a rotation callback on the process-wide logger.
pub fn register_rotation_callback<F: Fn() + Send + Sync + 'static>(callback: F) {
    if let Some(logger) = get() {
        logger.register_rotation_callback(callback);
    }
}

// Leveled calls against the process-wide logger. Before init they no-op:
// logging is never load-bearing for the caller.

#[track_caller]
pub fn debug<M: Into<String>>(message: M) {
    if let Some(logger) = get() {
        logger.debug(message);
    }
}

#[track_caller]
pub fn debug_with<M: Into<String>>(message: M, context: Context) {
    if let Some(logger) = get() {
        logger.debug_with(message, context);
    }
}

#[track_caller]
pub fn info<M: Into<String>>(message: M) {
    if let Some(logger) = get() {
        logger.info(message);
    }
}

#[track_caller]
pub fn info_with<M: Into<String>>(message: M, context: Context) {
    if let Some(logger) = get() {
        logger.info_with(message, context);
    }
}

#[track_caller]
pub fn warn<M: Into<String>>(message: M) {
    if let Some(logger) = get() {
        logger.warn(message);
    }
}

#[track_caller]
pub fn warn_with<M: Into<String>>(message: M, context: Context) {
    if let Some(logger) = get() {
        logger.warn_with(message, context);
    }
}

#[track_caller]
pub fn error<M: Into<String>>(message: M) {
    if let Some(logger) = get() {
        logger.error(message);
    }
}

#[track_caller]
pub fn error_with<M: Into<String>>(message: M, context: Context) {
    if let Some(logger) = get() {
        logger.error_with(message, context);
    }
}

#[track_caller]
pub fn fatal<M: Into<String>>(message: M) {
    if let Some(logger) = get() {
        logger.fatal(message);
    }
}

#[track_caller]
pub fn fatal_with<M: Into<String>>(message: M, context: Context) {
    if let Some(logger) = get() {
        logger.fatal_with(message, context);
    }
}
