//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path or `sqlite:` URL
    pub database_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Admin account bootstrapped on first start, if set
    pub admin_email: Option<String>,
    /// SMTP settings; reminder emails are disabled when absent
    pub smtp: Option<SmtpConfig>,
}

/// SMTP relay settings for the weekly reminder mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From address for outgoing mail (defaults to the SMTP user)
    pub from_address: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, all values can be set via a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "data/rota.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            admin_email: env::var("ADMIN_EMAIL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            smtp: Self::smtp_from_env(),
        })
    }

    /// SMTP config is optional: host, user and password must all be present.
    fn smtp_from_env() -> Option<SmtpConfig> {
        let host = env::var("SMTP_HOST").ok()?;
        let username = env::var("SMTP_USER").ok()?;
        let password = env::var("SMTP_PASS").ok()?;

        Some(SmtpConfig {
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            from_address: env::var("SMTP_FROM").unwrap_or_else(|_| username.clone()),
            host,
            username,
            password,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            admin_email: None,
            smtp: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
