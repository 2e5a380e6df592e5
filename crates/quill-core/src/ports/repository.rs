use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Author, Comment, Post, Tag};
use crate::error::RepoError;
use crate::query::{SearchHit, SearchQuery, SimilarPost};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create when it has no id yet, update otherwise).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post store. Every query except the `BaseRepository` ones only sees published posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Number of published posts, optionally restricted to those tagged `tag_id`.
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError>;

    /// Published posts, newest first.
    async fn list_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_published(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// Look a post up by its publish date (UTC) and slug.
    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Published posts sharing at least one tag with `post`, best match first.
    async fn similar(&self, post: &Post, limit: u64) -> Result<Vec<SimilarPost>, RepoError>;

    /// Relevance-ranked full-text search over title and body.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, RepoError>;
}

/// Comment store.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Active comments of a post, oldest first.
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}

/// Tag store, including the post/tag join table.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Tags of each post, keyed by post id. Posts without tags are absent.
    async fn tags_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, RepoError>;

    /// Tag a post. Attaching an existing pair is a no-op.
    async fn attach(&self, post_id: i64, tag_id: i64) -> Result<(), RepoError>;
}

/// Author store.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, i64> {}
