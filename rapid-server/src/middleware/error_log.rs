use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

pub const ERROR_LOG_FILE: &str = "error.log";

/// One compact JSON line in `error.log`, written for every 4xx/5xx
/// response. Short field names keep the grep surface small.
#[derive(Debug, Serialize)]
pub struct ErrorLogEntry {
    /// RFC 3339 timestamp with millisecond precision
    pub t: String,
    #[serde(rename = "requestID")]
    pub request_id: String,
    #[serde(rename = "traceID")]
    pub trace_id: String,
    /// HTTP status code
    pub st: u16,
    /// Method
    pub m: String,
    /// Path
    pub p: String,
    /// Raw query string
    pub q: String,
    /// Client IP
    pub ip: String,
    /// User agent
    pub ua: String,
    /// Latency in milliseconds
    pub l: u64,
    /// Accumulated handler errors
    pub e: String,
    /// Whitelisted request headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<BTreeMap<String, String>>,
    /// Request body, compacted when it parses as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req: Option<String>,
    /// Response body, compacted when it parses as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub res: Option<String>,
}

/// Append-only `error.log` writer. Holds its own file handle, independent
/// of the rotating sink: the file is never rotated or pruned, so incident
/// history survives log rotation.
#[derive(Clone)]
pub struct ErrorLogWriter {
    file: Arc<Mutex<File>>,
}

impl ErrorLogWriter {
    pub fn open(log_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(ERROR_LOG_FILE))?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Serialize the entry as one compact line and append it.
    pub fn write(&self, entry: &ErrorLogEntry) -> io::Result<()> {
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{line}")
    }
}
