use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_LOG_BUFFER_SIZE, DEFAULT_LOG_DIRECTORY,
    DEFAULT_LOG_LEVEL, DEFAULT_LOG_MAX_AGE_DAYS, DEFAULT_LOG_MAX_BACKUPS, DEFAULT_LOG_MAX_SIZE_MB,
    LogLevel,
};

use serde::Deserialize;

/// Settings for the rotating dual-sink logger.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Directory holding `<date>.log` files and `error.log`
    pub dir: String,
    /// Size threshold before the active file rolls over, in MB
    pub max_size_mb: u64,
    /// Rolled-over backups kept per directory
    pub max_backups: usize,
    /// Backups older than this are pruned, in days
    pub max_age_days: u64,
    /// Gzip rolled-over backups
    pub compress: bool,
    /// Reusable write buffer size, in bytes
    pub buffer_size: usize,
    /// Colorize console output
    pub colored: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            dir: String::from(DEFAULT_LOG_DIRECTORY),
            max_size_mb: DEFAULT_LOG_MAX_SIZE_MB,
            max_backups: DEFAULT_LOG_MAX_BACKUPS,
            max_age_days: DEFAULT_LOG_MAX_AGE_DAYS,
            compress: true,
            buffer_size: DEFAULT_LOG_BUFFER_SIZE,
            colored: true,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.dir.is_empty() {
            return Err(ConfigError::logging("logging.dir must not be empty"));
        }

        if self.max_size_mb == 0 {
            return Err(ConfigError::logging("logging.max_size_mb must be >= 1"));
        }

        if self.buffer_size == 0 {
            return Err(ConfigError::logging("logging.buffer_size must be >= 1"));
        }

        Ok(())
    }
}
