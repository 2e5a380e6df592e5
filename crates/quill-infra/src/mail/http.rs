//! HTTP relay mailer - hands messages to a transactional mail API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use quill_core::ports::{EmailMessage, MailError, Mailer};

/// Relay endpoint configuration.
#[derive(Debug, Clone)]
pub struct HttpMailerConfig {
    /// URL the message is POSTed to as JSON.
    pub endpoint: String,
    /// Sent as a bearer token when present.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
}

/// Mailer posting `{from, to, subject, text}` to a relay. One attempt per message.
pub struct HttpMailer {
    config: HttpMailerConfig,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: HttpMailerConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        let payload = RelayPayload {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Mail relay rejected message");
            return Err(MailError::Rejected(format!("{status}: {detail}")));
        }

        tracing::debug!(to = ?message.to, "Mail handed to relay");
        Ok(())
    }
}
