use crate::Level;

use std::path::PathBuf;

/// Logger settings, fixed for the lifetime of a `Logger`.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory holding `<date>.log` files
    pub dir: PathBuf,
    /// Size threshold before the active file rolls over, in bytes
    pub max_size: u64,
    /// Rolled-over backups kept per directory (0 = unlimited)
    pub max_backups: usize,
    /// Backups older than this are pruned, in days (0 = unlimited)
    pub max_age_days: u64,
    /// Gzip rolled-over backups
    pub compress: bool,
    /// Reusable write buffer size, in bytes
    pub buffer_size: usize,
    /// Colorize console output
    pub colored: bool,
    /// Events below this level are dropped
    pub min_level: Level,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            max_size: 1024 * 1024 * 1024,
            max_backups: 7,
            max_age_days: 7,
            compress: true,
            buffer_size: 8 * 1024,
            colored: true,
            min_level: Level::Debug,
        }
    }
}
