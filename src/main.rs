// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trash-Rota API Server
//!
//! Backend for a shared trash-duty rotation: a rolling 52-week calendar of
//! reservable weeks, admin management, and a weekly reminder email to the
//! current assignee.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trash_rota::{
    config::Config,
    db::Db,
    services::{notifier, Mailer, ReservationService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Trash-Rota API");

    // Open the database and make sure the schema exists
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to open database");
    db.run_migrations()
        .await
        .expect("Failed to run database migrations");
    tracing::info!(database = %config.database_url, "Database ready");

    // Create the admin account on first start, if configured
    bootstrap_admin(&db, &config)
        .await
        .expect("Failed to bootstrap admin account");

    // Initialize the SMTP mailer (disabled when SMTP is not configured)
    let mailer = Mailer::new(config.smtp.as_ref()).expect("Failed to initialize mailer");

    let reservations = ReservationService::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        reservations,
        mailer,
    });

    // Start the weekly reminder job
    notifier::spawn_weekly_reminder(state.clone());

    // Build router
    let app = trash_rota::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the admin account if `ADMIN_EMAIL` is set and no such user exists.
///
/// The account gets a well-known default password; the log line tells the
/// operator to change it after first login.
async fn bootstrap_admin(db: &Db, config: &Config) -> anyhow::Result<()> {
    const DEFAULT_PASSWORD: &str = "admin123";

    let Some(email) = &config.admin_email else {
        return Ok(());
    };

    if db.get_user_by_email(email).await?.is_some() {
        return Ok(());
    }

    let password_hash = bcrypt::hash(DEFAULT_PASSWORD, bcrypt::DEFAULT_COST)?;
    db.create_user(email, &password_hash, "Administrator", true)
        .await?;

    tracing::warn!(
        email = %email,
        "Admin account created with the default password, change it after first login"
    );

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trash_rota=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
