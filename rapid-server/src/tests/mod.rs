mod api;

use crate::middleware::{ApiRateLimiter, ErrorLogWriter};
use crate::{AppState, build_router};

use std::fs;
use std::sync::Arc;

use axum_test::TestServer;
use rapid_config::RateLimitConfig;
use rapid_log::{Logger, LoggerConfig};
use tempfile::TempDir;

pub(crate) struct TestApp {
    pub server: TestServer,
    pub logger: Logger,
    temp: TempDir,
}

/// Full router over a throwaway log directory, with a limit high enough to
/// never interfere.
pub(crate) fn spawn_app() -> TestApp {
    spawn_app_with_limit(RateLimitConfig {
        per_second: 1_000,
        burst: 1_000,
    })
}

pub(crate) fn spawn_app_with_limit(rate_limit: RateLimitConfig) -> TestApp {
    let temp = TempDir::new().unwrap();
    let log_dir = temp.path().join("logs");

    let logger = Logger::init(LoggerConfig {
        dir: log_dir.clone(),
        compress: false,
        colored: false,
        ..LoggerConfig::default()
    })
    .unwrap();

    let state = AppState {
        logger: logger.clone(),
        limiter: Arc::new(ApiRateLimiter::new(&rate_limit)),
        error_log: ErrorLogWriter::open(&log_dir).unwrap(),
    };

    TestApp {
        server: TestServer::new(build_router(state)).unwrap(),
        logger,
        temp,
    }
}

impl TestApp {
    /// Contents of the active date-named log file.
    pub fn log_contents(&self) -> String {
        fs::read_to_string(self.logger.current_log_path().unwrap()).unwrap()
    }

    /// Contents of `error.log`; empty string when nothing was rejected.
    pub fn error_log_contents(&self) -> String {
        fs::read_to_string(self.temp.path().join("logs").join("error.log")).unwrap()
    }
}
