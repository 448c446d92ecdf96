//! HTTP server wiring: request-ID correlation, request logging with an
//! `error.log` side channel, process-wide rate limiting, and a small sample
//! API behind a CORS-open router.

pub mod api;
pub mod error;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{Result as ServerResult, ServerError};
pub use routes::build_router;
pub use state::AppState;
