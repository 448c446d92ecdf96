use crate::{ConfigError, ConfigErrorResult, LoggingConfig, RateLimitConfig, ServerConfig};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for RAPID_CONFIG_DIR env var, else use ./.rapid/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply RAPID_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: RAPID_CONFIG_DIR env var > ./.rapid/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("RAPID_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".rapid"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.rate_limit.validate()?;

        // Log directory must stay under the working tree
        let log_dir = std::path::Path::new(&self.logging.dir);
        if self.logging.dir.contains("..") {
            return Err(ConfigError::logging(format!(
                "logging.dir cannot contain '..', got {}",
                log_dir.display()
            )));
        }

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        self.server.bind_addr()
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  logging: level={:?}, dir={}, max_size={}MB, backups={}, age={}d, compress={}",
            *self.logging.level,
            self.logging.dir,
            self.logging.max_size_mb,
            self.logging.max_backups,
            self.logging.max_age_days,
            self.logging.compress
        );
        info!(
            "  rate_limit: {}/s (burst {})",
            self.rate_limit.per_second, self.rate_limit.burst
        );
    }

    /// Apply environment variable overrides.
    /// Env vars take priority over config.toml values.
    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("RAPID_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("RAPID_SERVER_PORT", &mut self.server.port);

        // Logging
        Self::apply_env_parse("RAPID_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_string("RAPID_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_parse("RAPID_LOG_MAX_SIZE_MB", &mut self.logging.max_size_mb);
        Self::apply_env_parse("RAPID_LOG_MAX_BACKUPS", &mut self.logging.max_backups);
        Self::apply_env_parse("RAPID_LOG_MAX_AGE_DAYS", &mut self.logging.max_age_days);
        Self::apply_env_bool("RAPID_LOG_COMPRESS", &mut self.logging.compress);
        Self::apply_env_parse("RAPID_LOG_BUFFER_SIZE", &mut self.logging.buffer_size);
        Self::apply_env_bool("RAPID_LOG_COLORED", &mut self.logging.colored);

        // Rate limit
        Self::apply_env_parse("RAPID_RATE_LIMIT_PER_SECOND", &mut self.rate_limit.per_second);
        Self::apply_env_parse("RAPID_RATE_LIMIT_BURST", &mut self.rate_limit.burst);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }
}
