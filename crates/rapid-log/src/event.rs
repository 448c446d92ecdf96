use std::fmt;
use std::panic::Location;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

/// Placeholder for request/trace IDs outside any request scope.
pub const UNKNOWN_ID: &str = "unknown";

/// Arbitrary context fields attached to a log call.
pub type Context = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Closest `log` crate level, used for console color selection.
    pub(crate) fn as_log_level(self) -> log::Level {
        match self {
            Level::Debug => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warn => log::Level::Warn,
            Level::Error | Level::Fatal => log::Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call site of the leveled call, threaded through with `#[track_caller]`.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// One log event, frozen at emission time and fanned out to every sink.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub context: Context,
    pub caller: Option<Caller>,
    pub request_id: String,
    pub trace_id: String,
}

impl LogEvent {
    /// Request/trace IDs are pulled out of the context map so the formatter
    /// can render them separately; missing IDs become "unknown".
    pub fn new(level: Level, message: String, mut context: Context, caller: Option<Caller>) -> Self {
        let request_id = take_id(&mut context, "request_id");
        let trace_id = take_id(&mut context, "trace_id");

        Self {
            timestamp: Local::now(),
            level,
            message,
            context,
            caller,
            request_id,
            trace_id,
        }
    }
}

fn take_id(context: &mut Context, key: &str) -> String {
    match context.remove(key) {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::String(_)) | None => String::from(UNKNOWN_ID),
        Some(other) => other.to_string(),
    }
}

/// Build a context map from a `serde_json::json!` object literal.
/// A non-object value lands under a `data` key instead of being dropped.
pub fn context_from(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Context::new();
            map.insert(String::from("data"), other);
            map
        }
    }
}
