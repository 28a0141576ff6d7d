// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation-count aggregation for the fairness display.

use crate::db::Db;
use crate::error::Result;
use crate::models::stats::{with_fairness, UserStatsEntry};
use chrono::NaiveDate;

/// Per-user totals with fairness labels: one entry per non-admin user,
/// sorted by total descending, ties broken by name ascending.
///
/// Computed fresh from `today` on every call; nothing is persisted.
pub async fn compute_stats(db: &Db, today: NaiveDate) -> Result<Vec<UserStatsEntry>> {
    let rows = db.reservation_stats(today).await?;
    Ok(with_fairness(rows))
}
