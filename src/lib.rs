// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trash-Rota: shared trash-duty reservation calendar
//!
//! This crate provides the backend API for a rolling 52-week rotation
//! calendar: residents claim week slots, admins manage users and
//! reservations, and a weekly job emails the current assignee a reminder.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod week;

use config::Config;
use db::Db;
use services::{Mailer, ReservationService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub reservations: ReservationService,
    pub mailer: Mailer,
}
