// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reservation invariants and the 52-week calendar projection.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{
    Reservation, ReservationWithUser, SlotReservation, UserStatsEntry, WeekSlot,
};
use crate::services::stats;
use crate::week::{self, WINDOW_WEEKS};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashMap;

/// Business rules for claiming and releasing week slots.
///
/// All operations take `today` explicitly so tests can pin the clock.
#[derive(Clone)]
pub struct ReservationService {
    db: Db,
}

impl ReservationService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Build the rolling 52-week view plus fairness stats.
    ///
    /// Returns exactly [`WINDOW_WEEKS`] slots in ascending week order with
    /// unique week starts; occupied slots are annotated with `is_mine` for
    /// the viewer.
    pub async fn list_window(
        &self,
        viewer_id: i64,
        today: NaiveDate,
    ) -> Result<(Vec<WeekSlot>, Vec<UserStatsEntry>)> {
        let start = week::monday_of(today);
        let end = start + Duration::days((WINDOW_WEEKS * 7) as i64);

        let reservations = self.db.reservations_in_range(start, end).await?;
        let mut by_week: HashMap<NaiveDate, ReservationWithUser> = reservations
            .into_iter()
            .map(|r| (r.week_start, r))
            .collect();

        let weeks = week::week_window(today, WINDOW_WEEKS)
            .map(|monday| WeekSlot {
                week_start: monday,
                week_number: week::iso_week_number(monday),
                year: monday.year(),
                reservation: by_week.remove(&monday).map(|r| SlotReservation {
                    id: r.id,
                    user_id: r.user_id,
                    user_name: r.user_name,
                    is_mine: r.user_id == viewer_id,
                }),
            })
            .collect();

        let stats = stats::compute_stats(&self.db, today).await?;

        Ok((weeks, stats))
    }

    /// Claim `week_start` for `viewer_id`.
    ///
    /// Validates, in order: the date is a Monday, the week is not in the
    /// past (the current week is still reservable), and the week is free.
    /// The existence check is a fast-path rejection only; the UNIQUE index
    /// on `week_start` decides concurrent claims.
    pub async fn reserve(
        &self,
        viewer_id: i64,
        week_start: NaiveDate,
        today: NaiveDate,
    ) -> Result<Reservation> {
        if week_start.weekday() != Weekday::Mon {
            return Err(AppError::InvalidDay);
        }

        if week_start < week::monday_of(today) {
            return Err(AppError::PastWeek);
        }

        if self.db.reservation_for_week(week_start).await?.is_some() {
            return Err(AppError::AlreadyReserved);
        }

        self.db.insert_reservation(viewer_id, week_start).await
    }

    /// Cancel a reservation on behalf of the viewer.
    ///
    /// Owners may release strictly future weeks only; the running week
    /// counts as in progress. Admins may release any reservation at any
    /// time.
    pub async fn cancel(
        &self,
        viewer_id: i64,
        viewer_is_admin: bool,
        reservation_id: i64,
        today: NaiveDate,
    ) -> Result<()> {
        let reservation = self
            .db
            .get_reservation(reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", reservation_id)))?;

        if reservation.user_id != viewer_id && !viewer_is_admin {
            return Err(AppError::Forbidden);
        }

        if reservation.week_start <= week::monday_of(today) && !viewer_is_admin {
            return Err(AppError::WeekInProgress);
        }

        self.db.delete_reservation(reservation_id).await?;
        Ok(())
    }

    /// The reservation occupying the week starting at `week_start`, if any.
    ///
    /// Called by the weekly reminder job with the current week's Monday.
    pub async fn reservation_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<ReservationWithUser>> {
        self.db.reservation_for_week(week_start).await
    }
}
