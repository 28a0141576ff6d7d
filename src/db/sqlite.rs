// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, admin flag, cascade deletion)
//! - Reservations (week claims, window queries, stats aggregation)
//!
//! The UNIQUE index on `reservations.week_start` is the final arbiter for
//! concurrent claims; its violation surfaces as `AppError::AlreadyReserved`.

use crate::error::AppError;
use crate::models::{Reservation, ReservationWithUser, User, UserStats};
use crate::week::format_utc_rfc3339;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (or create) the database at `database_url`.
    ///
    /// Accepts a bare file path or a `sqlite:` URL. Foreign keys are enabled
    /// on every connection so user deletion cascades to reservations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let url = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            let parent = Path::new(database_url)
                .parent()
                .filter(|p| !p.as_os_str().is_empty());
            if let Some(parent) = parent {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::Database(format!("create data directory: {}", e)))?;
            }
            format!("sqlite://{}", database_url)
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| AppError::Database(format!("invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// In-memory database with migrations applied, for tests.
    ///
    /// A single never-recycled connection keeps the data alive for the
    /// lifetime of the pool.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Create the schema if it does not exist yet. Idempotent.
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        let stmts = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name          TEXT NOT NULL,
                is_admin      INTEGER NOT NULL DEFAULT 0,
                created_at    TEXT NOT NULL
            );"#,
            r#"
            CREATE TABLE IF NOT EXISTS reservations (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id    INTEGER NOT NULL,
                week_start TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );"#,
            "CREATE INDEX IF NOT EXISTS idx_reservations_week_start ON reservations(week_start);",
            "CREATE INDEX IF NOT EXISTS idx_reservations_user_id ON reservations(user_id);",
        ];

        for stmt in stmts {
            sqlx::query(stmt).execute(&self.pool).await?;
        }

        tracing::info!("Database schema ready");
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a user and return the stored row.
    ///
    /// A duplicate email is rejected as `InvalidInput`; the UNIQUE constraint
    /// backs the caller's pre-check.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<User, AppError> {
        let created_at = format_utc_rfc3339(chrono::Utc::now());

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, name, is_admin, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(is_admin)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::InvalidInput("email is already registered".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        self.get_user(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::Database("user row missing after insert".to_string()))
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Delete a user. Their reservations go with them (FK cascade).
    /// Returns `false` if no such user existed.
    pub async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Reservation Operations ──────────────────────────────────

    /// Insert a reservation for `week_start`.
    ///
    /// Concurrent claims race here: whichever insert loses the UNIQUE index
    /// on `week_start` gets `AlreadyReserved`.
    pub async fn insert_reservation(
        &self,
        user_id: i64,
        week_start: NaiveDate,
    ) -> Result<Reservation, AppError> {
        let created_at = format_utc_rfc3339(chrono::Utc::now());

        let result = sqlx::query(
            "INSERT INTO reservations (user_id, week_start, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(week_start)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::AlreadyReserved
            } else {
                AppError::from(e)
            }
        })?;

        self.get_reservation(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::Database("reservation row missing after insert".to_string()))
    }

    /// Get a reservation by id.
    pub async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, AppError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(reservation)
    }

    /// The reservation occupying `week_start`, joined with its owner.
    pub async fn reservation_for_week(
        &self,
        week_start: NaiveDate,
    ) -> Result<Option<ReservationWithUser>, AppError> {
        let reservation = sqlx::query_as::<_, ReservationWithUser>(
            "SELECT r.id, r.user_id, r.week_start, r.created_at, \
                    u.name AS user_name, u.email AS user_email \
             FROM reservations r \
             JOIN users u ON r.user_id = u.id \
             WHERE r.week_start = ?",
        )
        .bind(week_start)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reservation)
    }

    /// Reservations with `week_start` in the half-open range `[start, end)`,
    /// ascending, joined with their owners.
    pub async fn reservations_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ReservationWithUser>, AppError> {
        let reservations = sqlx::query_as::<_, ReservationWithUser>(
            "SELECT r.id, r.user_id, r.week_start, r.created_at, \
                    u.name AS user_name, u.email AS user_email \
             FROM reservations r \
             JOIN users u ON r.user_id = u.id \
             WHERE r.week_start >= ? AND r.week_start < ? \
             ORDER BY r.week_start ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Delete a reservation. Returns `false` if no such reservation existed.
    pub async fn delete_reservation(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Per-user reservation counts for all non-admin users, split into
    /// upcoming and past relative to `today`.
    ///
    /// Ordered by total descending, ties broken by name ascending.
    pub async fn reservation_stats(&self, today: NaiveDate) -> Result<Vec<UserStats>, AppError> {
        let stats = sqlx::query_as::<_, UserStats>(
            "SELECT \
                 u.id AS user_id, \
                 u.name AS user_name, \
                 COUNT(r.id) AS total_reservations, \
                 COALESCE(SUM(CASE WHEN r.week_start >= ? THEN 1 ELSE 0 END), 0) AS upcoming_reservations, \
                 COALESCE(SUM(CASE WHEN r.week_start < ? THEN 1 ELSE 0 END), 0) AS past_reservations \
             FROM users u \
             LEFT JOIN reservations r ON u.id = r.user_id \
             WHERE u.is_admin = 0 \
             GROUP BY u.id, u.name \
             ORDER BY total_reservations DESC, u.name ASC",
        )
        .bind(today)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
