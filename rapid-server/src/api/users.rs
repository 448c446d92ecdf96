//! Sample user endpoints. Thin placeholders: the interesting behavior lives
//! in the middleware stack wrapped around them.

use crate::api::ApiResponse;
use crate::middleware::RequestErrors;

use axum::extract::Query;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GetUserQuery {
    pub id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: u64,
    pub name: String,
}

/// GET /api/user?id=N
pub async fn get_user(
    Extension(errors): Extension<RequestErrors>,
    Query(query): Query<GetUserQuery>,
) -> ApiResponse<UserDto> {
    let Some(id) = query.id else {
        errors.push("missing id parameter");
        return ApiResponse::error(400, "missing id parameter");
    };

    ApiResponse::success(UserDto {
        id,
        name: format!("user-{id}"),
    })
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// POST /api/user
pub async fn create_user(
    Extension(errors): Extension<RequestErrors>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResponse<UserDto> {
    if request.name.is_empty() {
        errors.push("name must not be empty");
        return ApiResponse::error(400, "name must not be empty");
    }

    ApiResponse::success(UserDto {
        id: 1,
        name: request.name,
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/login
pub async fn login(
    Extension(errors): Extension<RequestErrors>,
    Json(request): Json<LoginRequest>,
) -> ApiResponse<LoginResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        errors.push("username and password required");
        return ApiResponse::error(400, "username and password required");
    }

    ApiResponse::success(LoginResponse {
        token: Uuid::new_v4().to_string(),
    })
}
