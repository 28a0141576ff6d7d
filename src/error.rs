// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// Every rejection is request-local and carries a machine-distinguishable
/// reason code in the response body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Not allowed for this user")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Week start must be a Monday")]
    InvalidDay,

    #[error("Cannot reserve a week in the past")]
    PastWeek,

    #[error("This week is already reserved")]
    AlreadyReserved,

    #[error("Cannot cancel a week that is in progress or past")]
    WeekInProgress,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", Some(msg.clone()))
            }
            AppError::InvalidDay => (StatusCode::BAD_REQUEST, "invalid_day", None),
            AppError::PastWeek => (StatusCode::BAD_REQUEST, "past_week", None),
            AppError::AlreadyReserved => (StatusCode::BAD_REQUEST, "already_reserved", None),
            AppError::WeekInProgress => (StatusCode::BAD_REQUEST, "week_in_progress", None),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_domain_errors_are_bad_requests() {
        assert_eq!(status_of(AppError::InvalidDay), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::PastWeek), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::AlreadyReserved), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::WeekInProgress), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_storage_errors_are_opaque_500s() {
        let err = AppError::Database("UNIQUE constraint failed".to_string());
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
