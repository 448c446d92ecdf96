use crate::tests::spawn_app;

use axum::http::StatusCode;
use googletest::assert_that;
use googletest::prelude::eq;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn given_health_endpoint_when_queried_then_healthy() {
    let app = spawn_app();

    let response = app.server.get("/health").await;

    assert_that!(response.status_code(), eq(StatusCode::OK));
    let body: Value = response.json();
    assert_that!(body["status"].as_str().unwrap(), eq("healthy"));
}

#[tokio::test]
async fn given_user_id_when_fetched_then_envelope_with_user() {
    let app = spawn_app();

    let response = app.server.get("/api/user").add_query_param("id", 7).await;

    let body: Value = response.json();
    assert_that!(body["code"].as_u64().unwrap(), eq(200));
    assert_that!(body["data"]["id"].as_u64().unwrap(), eq(7));
}

#[tokio::test]
async fn given_missing_user_id_when_fetched_then_400_envelope() {
    let app = spawn_app();

    let response = app.server.get("/api/user").await;

    assert_that!(response.status_code(), eq(StatusCode::BAD_REQUEST));
    let body: Value = response.json();
    assert_that!(body["code"].as_u64().unwrap(), eq(400));
    assert_that!(body["message"].as_str().unwrap(), eq("missing id parameter"));
}

#[tokio::test]
async fn given_new_user_when_created_then_echoed_back() {
    let app = spawn_app();

    let response = app.server.post("/api/user").json(&json!({"name": "ada"})).await;

    assert_that!(response.status_code(), eq(StatusCode::OK));
    let body: Value = response.json();
    assert_that!(body["data"]["name"].as_str().unwrap(), eq("ada"));
}

#[tokio::test]
async fn given_credentials_when_login_then_token_issued() {
    let app = spawn_app();

    let response = app
        .server
        .post("/api/login")
        .json(&json!({"username": "ada", "password": "s3cret"}))
        .await;

    assert_that!(response.status_code(), eq(StatusCode::OK));
    let body: Value = response.json();
    let token = body["data"]["token"].as_str().unwrap();
    assert_that!(Uuid::parse_str(token).is_ok(), eq(true));
}
