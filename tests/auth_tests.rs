// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login, and token handling tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_register_creates_non_admin_with_token() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "alice@example.com", "password": "password123", "name": "Alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["is_admin"], false);
    assert!(!body["token"].as_str().unwrap().is_empty());
    // Credential material never leaves the API
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (app, _) = common::create_test_app().await;
    common::register_user(&app, "alice@example.com", "Alice").await;

    let (status, body) = common::post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "alice@example.com", "password": "password123", "name": "Alice Again" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = common::post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "bob@example.com", "password": "short", "name": "Bob" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let (app, _) = common::create_test_app().await;

    let (status, _) = common::post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "not-an-email", "password": "password123", "name": "Bob" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_round_trip() {
    let (app, _) = common::create_test_app().await;
    common::register_user(&app, "alice@example.com", "Alice").await;

    let (status, body) = common::post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": "alice@example.com", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Alice");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = common::create_test_app().await;
    common::register_user(&app, "alice@example.com", "Alice").await;

    let (status, body) = common::post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": "alice@example.com", "password": "wrong-password" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let (app, _) = common::create_test_app().await;

    let (status, _) = common::post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": "ghost@example.com", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let (app, _) = common::create_test_app().await;

    let (status, _) = common::get_json(&app, "/api/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = common::get_json(&app, "/api/me", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let (app, _) = common::create_test_app().await;
    let (user_id, token) = common::register_user(&app, "alice@example.com", "Alice").await;

    let (status, body) = common::get_json(&app, "/api/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id);
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_token_in_cookie_is_accepted() {
    let (app, _) = common::create_test_app().await;
    let (_, token) = common::register_user(&app, "alice@example.com", "Alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .header(header::COOKIE, format!("rota_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let (app, state) = common::create_test_app().await;
    let (user_id, token) = common::register_user(&app, "alice@example.com", "Alice").await;

    assert!(state.db.delete_user(user_id).await.unwrap());

    let (status, _) = common::get_json(&app, "/api/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = common::get_json(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
