// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use trash_rota::config::Config;
use trash_rota::db::Db;
use trash_rota::routes::create_router;
use trash_rota::services::{Mailer, ReservationService};
use trash_rota::AppState;

/// In-memory database with migrations applied.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::in_memory().await.expect("in-memory database")
}

/// Create a test app over an in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;
    let reservations = ReservationService::new(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        reservations,
        mailer: Mailer::disabled(),
    });

    (create_router(state.clone()), state)
}

async fn read_json(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

fn with_token(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

/// POST a JSON body and return (status, parsed body).
#[allow(dead_code)]
pub async fn post_json(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let builder = with_token(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json"),
        token,
    );

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// GET a route and return (status, parsed body).
#[allow(dead_code)]
pub async fn get_json(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let builder = with_token(Request::builder().method("GET").uri(uri), token);

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// DELETE a route and return (status, parsed body).
#[allow(dead_code)]
pub async fn delete_json(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let builder = with_token(Request::builder().method("DELETE").uri(uri), token);

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// Register a user through the API; returns (user_id, token).
#[allow(dead_code)]
pub async fn register_user(app: &axum::Router, email: &str, name: &str) -> (i64, String) {
    let (status, body) = post_json(
        app,
        "/auth/register",
        None,
        serde_json::json!({
            "email": email,
            "password": "password123",
            "name": name,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    (
        body["user"]["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Create an admin account directly in the database and log in through the
/// API; returns (user_id, token).
#[allow(dead_code)]
pub async fn create_admin(
    app: &axum::Router,
    state: &Arc<AppState>,
    email: &str,
) -> (i64, String) {
    let password_hash = bcrypt::hash("password123", bcrypt::DEFAULT_COST).unwrap();
    let user = state
        .db
        .create_user(email, &password_hash, "Admin", true)
        .await
        .unwrap();

    let (status, body) = post_json(
        app,
        "/auth/login",
        None,
        serde_json::json!({ "email": email, "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);

    (user.id, body["token"].as_str().unwrap().to_string())
}
