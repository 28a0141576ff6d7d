// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie that may carry the session token instead of the Authorization header.
pub const SESSION_COOKIE: &str = "rota_token";

/// Session lifetime in seconds (7 days).
const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated viewer, resolved from the token and the users table.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

/// Middleware that requires a valid JWT belonging to a still-existing user.
///
/// Tokens can outlive accounts; looking the viewer up per request means a
/// deleted user is locked out immediately.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::Unauthorized),
        }
    };

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(&token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::InvalidToken)?;

    let user = state
        .db
        .get_user(user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let auth_user = AuthUser {
        id: user.id,
        email: user.email,
        name: user.name,
        is_admin: user.is_admin,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Middleware restricting a route tree to admin users.
///
/// Must run after `require_auth`, which inserts the `AuthUser` extension.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<AuthUser>()
        .map(|u| u.is_admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: i64, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_jwt_round_trip() {
        let key = b"test_jwt_key_32_bytes_minimum!!";
        let token = create_jwt(42, key).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(key),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "42");
        assert_eq!(decoded.claims.exp - decoded.claims.iat, SESSION_TTL_SECS);
    }

    #[test]
    fn test_jwt_rejects_wrong_key() {
        let token = create_jwt(42, b"one_signing_key_32_bytes_long!!!").unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"another_signing_key_32_bytes!!!!"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err());
    }
}
