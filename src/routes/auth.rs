// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login, and session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::PublicUser;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Syntactically valid bcrypt hash used to equalize timing when the email
/// is unknown.
const DUMMY_HASH: &str = "$2b$12$EXRkfkdmXn2gzds2SSitu.MW9.gAVqa9eLS1//RYtYCmB1eLHg.9q";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Session routes that require authentication (layered in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(me))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login: the public user plus a session token.
#[derive(Serialize)]
pub struct SessionResponse {
    pub user: PublicUser,
    pub token: String,
}

/// Register a new (non-admin) account and open a session.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    // Fast-path rejection; the UNIQUE constraint on email is the backstop
    if state.db.get_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::InvalidInput(
            "email is already registered".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing: {}", e)))?;

    let user = state
        .db
        .create_user(&payload.email, &password_hash, &payload.name, false)
        .await?;

    let token = create_jwt(user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation: {}", e)))?;

    tracing::info!(user_id = user.id, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Log in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let user = match state.db.get_user_by_email(&payload.email).await? {
        Some(user) => user,
        None => {
            // Dummy verification so unknown emails take as long as bad passwords
            let _ = bcrypt::verify(&payload.password, DUMMY_HASH);
            return Err(AppError::Unauthorized);
        }
    };

    let password_ok = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password verification: {}", e)))?;

    if !password_ok {
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation: {}", e)))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(SessionResponse {
        user: user.into(),
        token,
    }))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Current viewer's profile.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .get_user(viewer.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", viewer.id)))?;

    Ok(Json(MeResponse { user: user.into() }))
}
