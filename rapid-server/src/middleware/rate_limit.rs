use crate::AppState;
use crate::api::ApiResponse;
use crate::middleware::request_errors::RequestErrors;

use std::num::NonZeroU32;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use rapid_config::RateLimitConfig;

/// Process-wide token bucket guarding every route. Keying per client is a
/// deliberate non-feature; the budget protects the process as a whole.
pub struct ApiRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl ApiRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(config.per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst)),
        }
    }

    /// True when the request fits the current budget.
    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

/// Innermost middleware: reject over-budget requests with 429 before they
/// reach a handler. The surrounding request logger still sees the response,
/// so limited requests show up in `error.log`.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.limiter.check() {
        if let Some(errors) = request.extensions().get::<RequestErrors>() {
            errors.push("rate limit exceeded");
        }
        return ApiResponse::<()>::error(429, "too many requests, please retry later")
            .into_response();
    }

    next.run(request).await
}
