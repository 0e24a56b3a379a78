//! Mail delivery through an HTTP webhook (e.g. a transactional mail relay).

use super::{MailError, Mailer, OutgoingMail};
use async_trait::async_trait;
use std::time::Duration;

/// POSTs `{from, to, subject, text}` as JSON to the configured URL.
#[derive(Debug)]
pub struct WebhookMailer {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl WebhookMailer {
    pub fn new(url: String, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { url, token, client }
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let mut request = self.client.post(&self.url).json(mail);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_webhook_is_request_failure() {
        // Port 1 on localhost refuses connections
        let mailer = WebhookMailer::new("http://127.0.0.1:1/mail".to_string(), None);
        let mail = OutgoingMail {
            from: "bar@example.com".to_string(),
            to: "guest@example.com".to_string(),
            subject: "Reset your password".to_string(),
            text: "link".to_string(),
        };

        let err = mailer.send(&mail).await.unwrap_err();
        assert!(matches!(err, MailError::RequestFailed(_)));
    }
}
