// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SMTP delivery of weekly reminder emails.

use crate::config::SmtpConfig;
use crate::error::AppError;
use chrono::{Duration, NaiveDate};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP mailer.
///
/// The transport is `None` when SMTP is not configured; sends are then
/// skipped with a log line so the rest of the system behaves identically
/// with or without email.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl Mailer {
    /// Build a mailer from optional SMTP settings.
    pub fn new(smtp: Option<&SmtpConfig>) -> Result<Self, AppError> {
        let Some(smtp) = smtp else {
            tracing::warn!("SMTP not configured, reminder emails disabled");
            return Ok(Self::disabled());
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("SMTP transport setup: {}", e)))?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        tracing::info!(host = %smtp.host, port = smtp.port, "SMTP mailer initialized");

        Ok(Self {
            transport: Some(transport),
            from_address: smtp.from_address.clone(),
        })
    }

    /// Mailer with no transport, for tests and SMTP-less deployments.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from_address: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send the weekly duty reminder to the assignee. Skips when disabled.
    pub async fn send_week_reminder(
        &self,
        email: &str,
        name: &str,
        week_start: NaiveDate,
    ) -> Result<(), AppError> {
        let Some(transport) = &self.transport else {
            tracing::info!(to = %email, "SMTP disabled, skipping reminder email");
            return Ok(());
        };

        let message = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(email)?)
            .subject("Reminder: it's your trash duty week!")
            .header(ContentType::TEXT_HTML)
            .body(reminder_body(name, week_start))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("build reminder email: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("SMTP send: {}", e)))?;

        tracing::info!(to = %email, week_start = %week_start, "Reminder email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, AppError> {
    address
        .parse()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid email address {}: {}", address, e)))
}

fn reminder_body(name: &str, week_start: NaiveDate) -> String {
    let week_end = week_start + Duration::days(6);
    let fmt = "%A, %B %-d, %Y";

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2563eb;">Trash Duty Reminder</h2>
  <p>Hello {name},</p>
  <p>It's your turn to take out the trash this week!</p>
  <div style="background: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <p style="margin: 0;"><strong>Your week:</strong></p>
    <p style="margin: 5px 0;">From {start}</p>
    <p style="margin: 5px 0;">Through {end}</p>
  </div>
  <p>Don't forget the collection days!</p>
  <p style="color: #6b7280; font-size: 14px; margin-top: 30px;">
    This email was sent automatically by your building's trash-duty calendar.
  </p>
</div>"#,
        name = name,
        start = week_start.format(fmt),
        end = week_end.format(fmt),
    )
}
