// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod calendar;
pub mod reservation;
pub mod stats;
pub mod user;

pub use calendar::{SlotReservation, WeekSlot};
pub use reservation::{Reservation, ReservationWithUser};
pub use stats::{FairnessLabel, UserStats, UserStatsEntry};
pub use user::{PublicUser, User};
