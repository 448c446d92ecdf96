use crate::api::users::{create_user, get_user, login};
use crate::health::health_check;
use crate::middleware::{rate_limit, request_id, request_logger};
use crate::state::AppState;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router.
///
/// Layers added last run first, so the execution order is request-id,
/// request-logger, CORS, rate-limit, handler. IDs exist before anything
/// logs, and a rate-limited 429 still produces a traced log entry.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/user", get(get_user).post(create_user))
        .route("/api/login", post(login))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(cors)
        .layer(from_fn_with_state(state.clone(), request_logger))
        .layer(from_fn(request_id))
        .with_state(state)
}
