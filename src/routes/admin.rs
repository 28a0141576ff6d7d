// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin routes for managing users and reservations.
//!
//! All routes here sit behind both the auth and the admin gates; removal
//! operations are unconditional beyond that authorization.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PublicUser, ReservationWithUser};
use crate::routes::reservations::SuccessResponse;
use crate::week::{self, WINDOW_WEEKS};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{Duration, Local};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", delete(remove_user))
        .route("/api/admin/reservations", get(list_reservations))
        .route("/api/admin/reservations/{id}", delete(remove_reservation))
}

// ─── Users ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

/// List all accounts, newest first.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UsersResponse>> {
    let users = state
        .db
        .list_users()
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(Json(UsersResponse { users }))
}

/// Delete a user and, via the cascade, all their reservations.
async fn remove_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>> {
    if id == admin.id {
        return Err(AppError::InvalidInput(
            "cannot delete your own account".to_string(),
        ));
    }

    let deleted = state.db.delete_user(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    tracing::info!(admin_id = admin.id, user_id = id, "User deleted by admin");

    Ok(Json(SuccessResponse { success: true }))
}

// ─── Reservations ────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminReservationsResponse {
    pub reservations: Vec<ReservationWithUser>,
}

/// All reservations in the 52-week window, with owner names and emails.
async fn list_reservations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminReservationsResponse>> {
    let today = Local::now().date_naive();
    let start = week::monday_of(today);
    let end = start + Duration::days((WINDOW_WEEKS * 7) as i64);

    let reservations = state.db.reservations_in_range(start, end).await?;

    Ok(Json(AdminReservationsResponse { reservations }))
}

/// Delete any reservation, regardless of owner or timing.
async fn remove_reservation(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>> {
    let deleted = state.db.delete_reservation(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Reservation {} not found", id)));
    }

    tracing::info!(
        admin_id = admin.id,
        reservation_id = id,
        "Reservation deleted by admin"
    );

    Ok(Json(SuccessResponse { success: true }))
}
