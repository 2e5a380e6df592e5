//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    AuthorRepository, CommentRepository, Mailer, PostRepository, TagRepository,
};
use quill_infra::{ConsoleMailer, InMemoryBlogStore};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresAuthorRepository, PostgresCommentRepository,
    PostgresPostRepository, PostgresTagRepository,
};

use crate::config::{AppConfig, BlogSettings, MailBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub settings: Arc<BlogSettings>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let mailer = build_mailer(&config.mail);
        let settings = config.blog.clone();

        #[cfg(feature = "postgres")]
        let state = match &config.database {
            Some(db_config) => match connect(db_config).await {
                Some(connections) => Self::postgres(connections, mailer, settings),
                None => Self::in_memory(Arc::new(InMemoryBlogStore::new()), mailer, settings),
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(Arc::new(InMemoryBlogStore::new()), mailer, settings)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::in_memory(Arc::new(InMemoryBlogStore::new()), mailer, settings)
        };

        tracing::info!(storage = state.storage_backend(), "Application state initialized");
        state
    }

    /// State over a single in-memory store.
    pub fn in_memory(
        store: Arc<InMemoryBlogStore>,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
    ) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            tags: store.clone(),
            authors: store,
            mailer,
            settings: Arc::new(settings),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(
        connections: DatabaseConnections,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
    ) -> Self {
        let conn = connections.conn.clone();
        Self {
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(conn.clone())),
            authors: Arc::new(PostgresAuthorRepository::new(conn)),
            mailer,
            settings: Arc::new(settings),
            db: Some(Arc::new(connections)),
        }
    }

    /// Name of the store behind the repositories.
    #[cfg(feature = "postgres")]
    pub fn storage_backend(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }

    #[cfg(not(feature = "postgres"))]
    pub fn storage_backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(feature = "postgres")]
async fn connect(config: &DatabaseConfig) -> Option<DatabaseConnections> {
    match DatabaseConnections::init(config).await {
        Ok(connections) => Some(connections),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            None
        }
    }
}

fn build_mailer(backend: &MailBackend) -> Arc<dyn Mailer> {
    match backend {
        MailBackend::Console => Arc::new(ConsoleMailer),
        #[cfg(feature = "http-mail")]
        MailBackend::Http {
            endpoint,
            api_token,
            timeout,
        } => {
            let config = quill_infra::HttpMailerConfig {
                endpoint: endpoint.clone(),
                api_token: api_token.clone(),
                timeout: *timeout,
            };
            match quill_infra::HttpMailer::new(config) {
                Ok(mailer) => {
                    tracing::info!(%endpoint, "Mail relay configured");
                    Arc::new(mailer)
                }
                Err(e) => {
                    tracing::error!("Failed to build mail relay client: {}. Using console mail.", e);
                    Arc::new(ConsoleMailer)
                }
            }
        }
        #[cfg(not(feature = "http-mail"))]
        MailBackend::Http { .. } => {
            tracing::warn!("Built without http-mail feature - using console mail");
            Arc::new(ConsoleMailer)
        }
    }
}
