use crate::middleware::{ApiRateLimiter, ErrorLogWriter};

use std::sync::Arc;

use rapid_log::Logger;

/// Shared state threaded through the middleware stack and handlers.
#[derive(Clone)]
pub struct AppState {
    pub logger: Logger,
    pub limiter: Arc<ApiRateLimiter>,
    pub error_log: ErrorLogWriter,
}
