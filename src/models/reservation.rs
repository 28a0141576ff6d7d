// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation model for storage and API.

use chrono::NaiveDate;
use serde::Serialize;

/// A claim on exactly one calendar week.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Monday identifying the reserved week (stored as `YYYY-MM-DD`)
    pub week_start: NaiveDate,
    /// When the claim was made (RFC3339)
    pub created_at: String,
}

/// Reservation joined with its owner, for admin listings and the weekly
/// reminder job.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservationWithUser {
    pub id: i64,
    pub user_id: i64,
    pub week_start: NaiveDate,
    pub created_at: String,
    pub user_name: String,
    pub user_email: String,
}
