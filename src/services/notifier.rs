// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly reminder job.
//!
//! A single spawned task sleeps until each Monday 08:00 local time, looks up
//! the reservation for the running week, and emails its owner. Only one tick
//! is ever in flight, and a failed send never fails the job.

use crate::error::Result;
use crate::week;
use crate::AppState;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use std::sync::Arc;

/// Hour of day (local time) at which the Monday reminder fires.
const REMINDER_HOUR: u32 = 8;

/// Spawn the weekly reminder task.
pub fn spawn_weekly_reminder(state: Arc<AppState>) {
    tokio::spawn(async move {
        tracing::info!(
            hour = REMINDER_HOUR,
            "Weekly reminder job scheduled (Mondays)"
        );

        loop {
            let now = Local::now();
            let next = next_reminder_at(now);
            let sleep_for = (next - now).to_std().unwrap_or_default();

            tracing::debug!(next = %next, "Sleeping until next reminder tick");
            tokio::time::sleep(sleep_for).await;

            let today = Local::now().date_naive();
            if let Err(e) = send_due_reminder(&state, today).await {
                tracing::error!(error = %e, "Weekly reminder tick failed");
            }
        }
    });
}

/// Look up this week's assignee and send the reminder.
///
/// Email failures are logged and swallowed: a missed reminder must not fail
/// the job or touch reservation state.
pub async fn send_due_reminder(state: &AppState, today: NaiveDate) -> Result<()> {
    let monday = week::monday_of(today);

    match state.reservations.reservation_for_week(monday).await? {
        Some(reservation) => {
            tracing::info!(
                user_id = reservation.user_id,
                week_start = %monday,
                "Sending weekly duty reminder"
            );

            if let Err(e) = state
                .mailer
                .send_week_reminder(
                    &reservation.user_email,
                    &reservation.user_name,
                    reservation.week_start,
                )
                .await
            {
                tracing::error!(error = %e, to = %reservation.user_email, "Reminder email failed");
            }
        }
        None => {
            tracing::info!(week_start = %monday, "No reservation for the current week, nothing to send");
        }
    }

    Ok(())
}

/// The next Monday 08:00 local strictly after `now`.
fn next_reminder_at(now: DateTime<Local>) -> DateTime<Local> {
    let fire_time = NaiveTime::from_hms_opt(REMINDER_HOUR, 0, 0).unwrap();

    let day = if now.weekday() == Weekday::Mon && now.time() < fire_time {
        now.date_naive()
    } else {
        week::monday_of(now.date_naive()) + Duration::days(7)
    };

    // A DST gap at the fire time is vanishingly unlikely on a Monday
    // morning; retry in an hour if the local time doesn't exist.
    day.and_time(fire_time)
        .and_local_timezone(Local)
        .single()
        .unwrap_or_else(|| now + Duration::hours(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_next_tick_is_always_a_future_monday_morning() {
        // 2024-01-03 is a Wednesday
        let next = next_reminder_at(local(2024, 1, 3, 12, 0));

        assert_eq!(next.weekday(), Weekday::Mon);
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(next.hour(), REMINDER_HOUR);
    }

    #[test]
    fn test_monday_before_the_hour_fires_same_day() {
        let now = local(2024, 1, 1, 7, 30);
        let next = next_reminder_at(now);

        assert_eq!(next.date_naive(), now.date_naive());
        assert_eq!(next.hour(), REMINDER_HOUR);
        assert!(next > now);
    }

    #[test]
    fn test_monday_after_the_hour_waits_a_week() {
        let next = next_reminder_at(local(2024, 1, 1, 8, 0));
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_sunday_rolls_to_tomorrow() {
        // 2024-01-07 is a Sunday; the next Monday is the 8th
        let next = next_reminder_at(local(2024, 1, 7, 23, 0));
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }
}
