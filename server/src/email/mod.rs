//! Outgoing email: delivery backends, per-user cooldowns and the cleanup task.
//!
//! Delivery is abstracted behind the [`Mailer`] trait:
//! - [`LogMailer`] writes the message to the log (default, for development)
//! - [`WebhookMailer`] POSTs the message as JSON to `MAIL_WEBHOOK_URL`

pub mod cleanup;
mod cooldown;
mod log;
mod templates;
mod webhook;

pub use cooldown::{check_cooldown, last_sent_at, record_sent, EmailAction};
pub use log::LogMailer;
pub use templates::{reset_password_mail, verify_email_mail};
pub use webhook::WebhookMailer;

use crate::config::MailConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::PgConnection;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    RequestFailed(String),

    #[error("Mail service returned error: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// A fully rendered message ready for delivery.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Delivery backend for outgoing mail.
#[async_trait]
pub trait Mailer: Send + Sync + fmt::Debug {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;

    /// Backend name for logs ("log", "webhook").
    fn name(&self) -> &'static str;
}

/// Pick the delivery backend from config: webhook when a URL is set,
/// otherwise the log mailer.
pub fn mailer_from_config(config: &MailConfig) -> Arc<dyn Mailer> {
    match &config.webhook_url {
        Some(url) => Arc::new(WebhookMailer::new(
            url.clone(),
            config.webhook_token.clone(),
        )),
        None => Arc::new(LogMailer),
    }
}

fn cooldown_rejection(
    last_sent: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    action: EmailAction,
) -> Result<(), ApiError> {
    check_cooldown(last_sent, now, action).map_err(ApiError::BadRequest)
}

/// 400 while the user is still inside the cooldown window for `action`.
/// Call before creating anything the mail would carry, such as a token.
pub fn ensure_cooldown_elapsed(
    conn: &mut PgConnection,
    user_id: Uuid,
    action: EmailAction,
) -> Result<(), ApiError> {
    let last = last_sent_at(conn, user_id, action)?;
    cooldown_rejection(last, Utc::now(), action)
}

/// Send `mail` for `action` unless the user is still inside the cooldown
/// window, then record the send time.
pub async fn send_with_cooldown(
    conn: &mut PgConnection,
    mailer: &dyn Mailer,
    user_id: Uuid,
    action: EmailAction,
    mail: OutgoingMail,
) -> Result<(), ApiError> {
    ensure_cooldown_elapsed(conn, user_id, action)?;

    mailer.send(&mail).await?;
    tracing::info!(action = action.as_str(), mailer = mailer.name(), "Sent email");

    record_sent(conn, user_id, action, Utc::now())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Duration;

    #[test]
    fn test_cooldown_rejection_is_bad_request() {
        let now = Utc::now();
        let err = cooldown_rejection(
            Some(now - Duration::seconds(30)),
            now,
            EmailAction::ResetPassword,
        )
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "You can only request reset-password every 2 minutes"
        );

        assert!(cooldown_rejection(None, now, EmailAction::ResetPassword).is_ok());
    }

    #[test]
    fn test_mailer_defaults_to_log() {
        let config = MailConfig {
            from: "noreply@example.com".into(),
            webhook_url: None,
            webhook_token: None,
        };
        assert_eq!(mailer_from_config(&config).name(), "log");
    }
}
