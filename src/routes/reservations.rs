// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation calendar routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Reservation, UserStatsEntry, WeekSlot};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route("/api/reservations/{id}", delete(cancel_reservation))
}

// ─── Calendar View ───────────────────────────────────────────

/// The 52-week window plus fairness stats.
#[derive(Serialize)]
pub struct CalendarResponse {
    pub weeks: Vec<WeekSlot>,
    pub stats: Vec<UserStatsEntry>,
}

/// Get the rolling 52-week calendar as seen by the viewer.
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<AuthUser>,
) -> Result<Json<CalendarResponse>> {
    let today = Local::now().date_naive();

    tracing::debug!(user_id = viewer.id, "Building 52-week calendar");

    let (weeks, stats) = state.reservations.list_window(viewer.id, today).await?;

    Ok(Json(CalendarResponse { weeks, stats }))
}

// ─── Claim / Cancel ──────────────────────────────────────────

#[derive(Deserialize)]
struct CreateReservationRequest {
    /// Monday of the requested week, `YYYY-MM-DD`
    week_start: String,
}

#[derive(Serialize)]
pub struct ReservationResponse {
    pub reservation: Reservation,
}

/// Claim a week for the viewer.
async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<AuthUser>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>)> {
    let week_start = NaiveDate::parse_from_str(payload.week_start.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput("week_start must be a YYYY-MM-DD date".to_string()))?;

    let today = Local::now().date_naive();
    let reservation = state
        .reservations
        .reserve(viewer.id, week_start, today)
        .await?;

    tracing::info!(
        user_id = viewer.id,
        week_start = %reservation.week_start,
        "Week reserved"
    );

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse { reservation }),
    ))
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Cancel a reservation (owner for future weeks, admin any time).
async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>> {
    let today = Local::now().date_naive();

    state
        .reservations
        .cancel(viewer.id, viewer.is_admin, id, today)
        .await?;

    tracing::info!(user_id = viewer.id, reservation_id = id, "Reservation cancelled");

    Ok(Json(SuccessResponse { success: true }))
}
