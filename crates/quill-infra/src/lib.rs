//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the blog stores and the outgoing mail transports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store and console/outbox mail only
//! - `postgres` - PostgreSQL stores via SeaORM
//! - `http-mail` - Mail relay over HTTP via reqwest

pub mod database;
pub mod mail;

// Re-exports - In-Memory
pub use database::memory::InMemoryBlogStore;
pub use mail::{ConsoleMailer, OutboxMailer};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "http-mail")]
pub use mail::{HttpMailer, HttpMailerConfig};
