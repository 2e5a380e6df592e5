//! Outbox mailer - keeps sent messages in memory.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::ports::{EmailMessage, MailError, Mailer};

/// Collects messages instead of delivering them. Can be switched to fail every send.
#[derive(Default)]
pub struct OutboxMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failing: AtomicBool,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An outbox whose transport is down.
    pub fn failing() -> Self {
        let mailer = Self::default();
        mailer.failing.store(true, Ordering::Relaxed);
        mailer
    }

    /// Messages accepted so far, oldest first.
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(MailError::Transport("outbox is offline".to_string()));
        }
        self.sent.lock().await.push(message);
        Ok(())
    }
}
