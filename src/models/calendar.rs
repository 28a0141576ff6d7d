// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived week-slot projection for the calendar view.

use chrono::NaiveDate;
use serde::Serialize;

/// One week in the rolling 52-week window.
///
/// Regenerated on every read, never stored. `year` is the calendar year of
/// the Monday, which can differ from the ISO week-year at year boundaries.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSlot {
    pub week_start: NaiveDate,
    /// ISO-8601 week number
    pub week_number: u32,
    pub year: i32,
    /// `None` when the week is free
    pub reservation: Option<SlotReservation>,
}

/// Occupying reservation as seen by the requesting viewer.
#[derive(Debug, Clone, Serialize)]
pub struct SlotReservation {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    /// Whether the viewer owns this reservation
    pub is_mine: bool,
}
