use crate::error::{LogError, LogErrorResult};
use crate::event::LogEvent;
use crate::{Formatter, LoggerConfig, Sink, WriterPool};

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use chrono::Local;
use flate2::Compression;
use flate2::write::GzEncoder;

const DATE_FORMAT: &str = "%Y-%m-%d";
const ERROR_LOG_NAME: &str = "error.log";

/// Mutable sink state, only touched while holding the manager lock.
struct FileSinkState {
    date: String,
    file: File,
    size: u64,
}

/// Owns the active `<dir>/<date>.log` handle and its rotation limits.
///
/// Every write and every rotation goes through the same lock, so a rotation
/// can never split, drop, or duplicate a concurrently written line.
pub struct FileSinkManager {
    dir: PathBuf,
    max_size: u64,
    max_backups: usize,
    max_age: Duration,
    compress: bool,
    state: Mutex<Option<FileSinkState>>,
}

impl FileSinkManager {
    /// Create the log directory and open today's file in append mode.
    pub fn open(config: &LoggerConfig) -> LogErrorResult<Self> {
        fs::create_dir_all(&config.dir).map_err(|e| LogError::io(&config.dir, e))?;

        let manager = Self {
            dir: config.dir.clone(),
            max_size: config.max_size,
            max_backups: config.max_backups,
            max_age: Duration::from_secs(config.max_age_days * 24 * 60 * 60),
            compress: config.compress,
            state: Mutex::new(None),
        };

        let date = today();
        let state = manager.open_for_date(&date)?;
        *manager.state.lock().unwrap() = Some(state);

        Ok(manager)
    }

    fn open_for_date(&self, date: &str) -> LogErrorResult<FileSinkState> {
        let path = self.path_for_date(date);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogError::io(&path, e))?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(FileSinkState {
            date: String::from(date),
            file,
            size,
        })
    }

    pub fn path_for_date(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}.log"))
    }

    /// Path of the active file, None once closed.
    pub fn current_path(&self) -> Option<PathBuf> {
        let guard = self.state.lock().unwrap();
        guard.as_ref().map(|state| self.path_for_date(&state.date))
    }

    /// Write one rendered line. Rolls the file over first when the line
    /// would push it past the size limit.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut guard = self.state.lock().unwrap();
        let Some(state) = guard.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "file sink is closed",
            ));
        };

        if state.size > 0 && state.size + bytes.len() as u64 > self.max_size {
            self.roll_over(state)?;
        }

        state.file.write_all(bytes)?;
        state.size += bytes.len() as u64;
        Ok(())
    }

    /// Rename the full active file to a timestamped backup and reopen fresh.
    fn roll_over(&self, state: &mut FileSinkState) -> io::Result<()> {
        state.file.flush()?;

        let current = self.path_for_date(&state.date);
        let backup = self.dir.join(format!(
            "{}-{}.log",
            state.date,
            Local::now().format("%H%M%S%3f")
        ));
        fs::rename(&current, &backup)?;

        if self.compress
            && let Err(e) = compress_file(&backup)
        {
            eprintln!("failed to compress rotated log {}: {e}", backup.display());
        }

        self.prune_backups(&state.date);

        state.file = OpenOptions::new().create(true).append(true).open(&current)?;
        state.size = 0;
        Ok(())
    }

    /// Forced rotation: reopen for the current date and prune.
    pub fn rotate(&self) -> LogErrorResult<()> {
        self.rotate_to_date(&today())
    }

    /// Switch the active file to the given date unconditionally.
    pub fn rotate_to_date(&self, date: &str) -> LogErrorResult<()> {
        let mut guard = self.state.lock().unwrap();
        let Some(state) = guard.as_mut() else {
            return Ok(());
        };

        let _ = state.file.flush();
        *state = self.open_for_date(date)?;
        self.prune_backups(date);
        Ok(())
    }

    /// Day-boundary check. Returns true when the active file switched dates.
    pub fn rotate_if_date_changed(&self) -> LogErrorResult<bool> {
        let date = today();

        let mut guard = self.state.lock().unwrap();
        let Some(state) = guard.as_mut() else {
            return Ok(false);
        };
        if state.date == date {
            return Ok(false);
        }

        let _ = state.file.flush();
        *state = self.open_for_date(&date)?;
        self.prune_backups(&date);
        Ok(true)
    }

    /// Drop backups beyond the age and count limits. Best effort: a file
    /// that cannot be removed is skipped, not fatal.
    fn prune_backups(&self, keep_date: &str) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };

        let keep_name = format!("{keep_date}.log");
        let mut backups: Vec<(PathBuf, SystemTime)> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name == keep_name || name == ERROR_LOG_NAME {
                    return None;
                }
                if !name.ends_with(".log") && !name.ends_with(".log.gz") {
                    return None;
                }
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((entry.path(), modified))
            })
            .collect();

        if self.max_age > Duration::ZERO {
            let now = SystemTime::now();
            backups.retain(|(path, modified)| {
                let expired = now
                    .duration_since(*modified)
                    .map(|age| age > self.max_age)
                    .unwrap_or(false);
                if expired {
                    let _ = fs::remove_file(path);
                }
                !expired
            });
        }

        if self.max_backups > 0 && backups.len() > self.max_backups {
            backups.sort_by_key(|(_, modified)| *modified);
            let excess = backups.len() - self.max_backups;
            for (path, _) in backups.into_iter().take(excess) {
                let _ = fs::remove_file(path);
            }
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        let mut guard = self.state.lock().unwrap();
        match guard.as_mut() {
            Some(state) => state.file.flush(),
            None => Ok(()),
        }
    }

    /// Flush and close the active handle. Subsequent writes fail.
    pub fn close(&self) -> io::Result<()> {
        let mut guard = self.state.lock().unwrap();
        match guard.take() {
            Some(mut state) => state.file.flush(),
            None => Ok(()),
        }
    }
}

/// The file side of the logger: verbose formatting, pooled buffers, and the
/// rotating date-named file.
pub struct RotatingFileSink {
    formatter: Formatter,
    pool: WriterPool,
    manager: FileSinkManager,
}

impl RotatingFileSink {
    pub fn open(config: &LoggerConfig) -> LogErrorResult<Self> {
        Ok(Self {
            formatter: Formatter::file(),
            pool: WriterPool::new(config.buffer_size),
            manager: FileSinkManager::open(config)?,
        })
    }

    pub fn manager(&self) -> &FileSinkManager {
        &self.manager
    }
}

impl Sink for RotatingFileSink {
    fn emit(&self, event: &LogEvent) -> io::Result<()> {
        let line = self.formatter.format(event);
        self.pool.write(&self.manager, &line)
    }

    fn flush(&self) -> io::Result<()> {
        self.manager.flush()
    }
}

/// Gzip a rotated backup in place: `<name>.log` becomes `<name>.log.gz`.
fn compress_file(path: &Path) -> io::Result<()> {
    let mut source = File::open(path)?;
    let target_path = path.with_extension("log.gz");
    let target = File::create(&target_path)?;

    let mut encoder = GzEncoder::new(target, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.flush()?;

    fs::remove_file(path)
}

fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}
