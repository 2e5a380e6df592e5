//! Console mailer - writes messages to the log instead of sending them.

use async_trait::async_trait;

use quill_core::ports::{EmailMessage, MailError, Mailer};

/// Development mailer: every message is logged and reported as sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            from = %message.from,
            to = ?message.to,
            subject = %message.subject,
            "Email (console backend)"
        );
        tracing::debug!(body = %message.body, "Email body");
        Ok(())
    }
}
