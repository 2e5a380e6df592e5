//! Mailer implementations.

mod console;
mod outbox;

pub use console::ConsoleMailer;
pub use outbox::OutboxMailer;

#[cfg(feature = "http-mail")]
mod http;
#[cfg(feature = "http-mail")]
pub use self::http::{HttpMailer, HttpMailerConfig};
