// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod mailer;
pub mod notifier;
pub mod reservation;
pub mod stats;

pub use mailer::Mailer;
pub use reservation::ReservationService;
