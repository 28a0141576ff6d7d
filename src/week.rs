// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week arithmetic for the rotation calendar.
//!
//! Weeks run Monday through Sunday and are identified by their Monday
//! (`week_start`). All functions take dates explicitly; nothing in this
//! module reads the clock, so callers and tests control "today".

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Number of week slots in the rolling reservation window.
pub const WINDOW_WEEKS: usize = 52;

/// The Monday of the week containing `date`.
///
/// Sundays map 6 days back: weeks are never Sunday-first.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ISO-8601 week number (the week containing the year's first Thursday
/// is week 1).
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// `count` consecutive Mondays starting at `monday_of(anchor)`, stepping
/// 7 days each.
pub fn week_window(anchor: NaiveDate, count: usize) -> impl Iterator<Item = NaiveDate> {
    let start = monday_of(anchor);
    (0..count as i64).map(move |i| start + Duration::days(7 * i))
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix (stored form of
/// `created_at` columns).
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
