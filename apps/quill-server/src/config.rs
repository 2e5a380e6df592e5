//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use quill_core::query::DEFAULT_SEARCH_LANGUAGE;
use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub blog: BlogSettings,
    pub mail: MailBackend,
}

/// Settings the blog handlers read at request time.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// Text search configuration passed to Postgres (`english`, `simple`, ...).
    pub search_language: String,
    /// Scheme and host used in shared links. Falls back to the request's own.
    pub public_base_url: Option<String>,
    /// Sender address of recommendation emails.
    pub mail_from: String,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            search_language: DEFAULT_SEARCH_LANGUAGE.to_string(),
            public_base_url: None,
            mail_from: "noreply@quillpost.local".to_string(),
        }
    }
}

/// Where outgoing mail goes.
#[derive(Debug, Clone)]
pub enum MailBackend {
    /// Logged, never delivered.
    Console,
    /// POSTed to a transactional mail relay.
    Http {
        endpoint: String,
        api_token: Option<String>,
        timeout: Duration,
    },
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parsed("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parsed("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let defaults = BlogSettings::default();
        let blog = BlogSettings {
            search_language: env::var("SEARCH_LANGUAGE").unwrap_or(defaults.search_language),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            mail_from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            blog,
            mail: Self::mail_backend(),
        }
    }

    /// MAIL_BACKEND=http requires MAIL_RELAY_URL; anything else logs to the console.
    fn mail_backend() -> MailBackend {
        let backend = env::var("MAIL_BACKEND").unwrap_or_default().to_lowercase();
        if backend != "http" {
            return MailBackend::Console;
        }

        match env::var("MAIL_RELAY_URL") {
            Ok(endpoint) => MailBackend::Http {
                endpoint,
                api_token: env::var("MAIL_RELAY_TOKEN").ok(),
                timeout: Duration::from_secs(parsed("MAIL_TIMEOUT_SECS").unwrap_or(10)),
            },
            Err(_) => {
                tracing::warn!("MAIL_BACKEND=http but MAIL_RELAY_URL is not set, using console mail");
                MailBackend::Console
            }
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
