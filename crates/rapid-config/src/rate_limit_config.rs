use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Rate limit constraints
pub const MIN_RATE_LIMIT_PER_SECOND: u32 = 1;
pub const MAX_RATE_LIMIT_PER_SECOND: u32 = 100_000;
pub const DEFAULT_RATE_LIMIT_PER_SECOND: u32 = 500;

pub const MIN_RATE_LIMIT_BURST: u32 = 1;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 300;

/// Rate limiting settings.
/// Applied process-wide at the middleware boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub per_second: u32,
    /// Maximum burst above the sustained rate
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: DEFAULT_RATE_LIMIT_PER_SECOND,
            burst: DEFAULT_RATE_LIMIT_BURST,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.per_second < MIN_RATE_LIMIT_PER_SECOND
            || self.per_second > MAX_RATE_LIMIT_PER_SECOND
        {
            return Err(ConfigError::config(format!(
                "rate_limit.per_second must be {}-{}, got {}",
                MIN_RATE_LIMIT_PER_SECOND, MAX_RATE_LIMIT_PER_SECOND, self.per_second
            )));
        }

        if self.burst < MIN_RATE_LIMIT_BURST {
            return Err(ConfigError::config(format!(
                "rate_limit.burst must be >= {}, got {}",
                MIN_RATE_LIMIT_BURST, self.burst
            )));
        }

        Ok(())
    }
}
