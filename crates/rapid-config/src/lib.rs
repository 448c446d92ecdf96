mod config;
mod error;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod server_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::RateLimitConfig;
pub use server_config::ServerConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_LOG_MAX_SIZE_MB: u64 = 1024;
const DEFAULT_LOG_MAX_BACKUPS: usize = 7;
const DEFAULT_LOG_MAX_AGE_DAYS: u64 = 7;
const DEFAULT_LOG_BUFFER_SIZE: usize = 8 * 1024;
