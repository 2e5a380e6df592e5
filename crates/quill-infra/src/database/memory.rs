//! In-memory blog store - used when no database is configured, and in tests.
//!
//! Mirrors the PostgreSQL stores, constraints included (slug per publish date,
//! unique tag slugs, comment and tag links pointing at existing rows).
//! Note: Data is lost on process restart.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use quill_core::domain::{Author, Comment, Post, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{
    AuthorRepository, BaseRepository, CommentRepository, PostRepository, TagRepository,
};
use quill_core::query::{SearchHit, SearchQuery, SimilarPost, order_search_hits, rank_similar};

/// Weight of a query term found in the title.
const TITLE_WEIGHT: f32 = 1.0;
/// Weight of a query term found only in the body.
const BODY_WEIGHT: f32 = 0.4;

/// Rows keyed by id plus the last id handed out.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    /// Id for a row being saved: fresh for new rows, unchanged otherwise.
    fn assign_id(&mut self, id: i64) -> i64 {
        if id == 0 {
            self.last_id += 1;
            self.last_id
        } else {
            self.last_id = self.last_id.max(id);
            id
        }
    }
}

#[derive(Default)]
struct Tables {
    authors: Table<Author>,
    posts: Table<Post>,
    comments: Table<Comment>,
    tags: Table<Tag>,
    /// (post_id, tag_id)
    post_tags: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn tag_ids_of(&self, post_id: i64) -> Vec<i64> {
        self.post_tags
            .range((post_id, i64::MIN)..=(post_id, i64::MAX))
            .map(|(_, tag_id)| *tag_id)
            .collect()
    }

    fn published(&self, tag_id: Option<i64>) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .rows
            .values()
            .filter(|p| p.is_published())
            .filter(|p| tag_id.is_none_or(|t| self.post_tags.contains(&(p.id, t))))
            .collect();
        posts.sort_by(|a, b| b.publish.cmp(&a.publish).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Blog store backed by maps behind an async RwLock.
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Weighted share of query terms found in the post; title hits count more than body hits.
fn text_rank(query_terms: &[String], post: &Post) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let title: HashSet<String> = terms(&post.title).into_iter().collect();
    let body: HashSet<String> = terms(&post.body).into_iter().collect();

    let score: f32 = query_terms
        .iter()
        .map(|term| {
            if title.contains(term) {
                TITLE_WEIGHT
            } else if body.contains(term) {
                BODY_WEIGHT
            } else {
                0.0
            }
        })
        .sum();
    score / query_terms.len() as f32
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.rows.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .posts
            .rows
            .values()
            .any(|other| other.slug_conflicts_with(&post))
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug,
                post.publish_date()
            )));
        }
        post.id = tables.posts.assign_id(post.id);
        tables.posts.rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.rows.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.rows.retain(|_, c| c.post_id != id);
        tables.post_tags.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.published(tag_id).len() as u64)
    }

    async fn list_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published(tag_id)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_published(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .rows
            .get(&id)
            .filter(|p| p.is_published())
            .cloned())
    }

    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .rows
            .values()
            .find(|p| p.is_published() && p.slug == slug && p.publish_date() == date)
            .cloned())
    }

    async fn similar(&self, post: &Post, limit: u64) -> Result<Vec<SimilarPost>, RepoError> {
        let tables = self.tables.read().await;
        let source_tags = tables.tag_ids_of(post.id);
        let candidates = tables
            .published(None)
            .into_iter()
            .map(|p| (p.clone(), tables.tag_ids_of(p.id)));
        Ok(rank_similar(post.id, &source_tags, candidates, limit))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, RepoError> {
        if query.is_blank() {
            return Ok(Vec::new());
        }
        let query_terms = terms(&query.text);
        let tables = self.tables.read().await;
        let hits = tables
            .published(None)
            .into_iter()
            .map(|p| SearchHit {
                post: p.clone(),
                rank: text_rank(&query_terms, p),
            })
            .collect();
        Ok(order_search_hits(hits, query.min_rank))
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.rows.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.rows.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        comment.id = tables.comments.assign_id(comment.id);
        tables.comments.rows.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .rows
            .values()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<Tag, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.rows.get(&id).cloned())
    }

    async fn save(&self, mut tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .tags
            .rows
            .values()
            .any(|t| t.id != tag.id && (t.slug == tag.slug || t.name == tag.name))
        {
            return Err(RepoError::Constraint(format!(
                "tag '{}' already exists",
                tag.slug
            )));
        }
        tag.id = tables.tags.assign_id(tag.id);
        tables.tags.rows.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.tags.rows.remove(&id).ok_or(RepoError::NotFound)?;
        tables.post_tags.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.rows.values().find(|t| t.slug == slug).cloned())
    }

    async fn tags_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, RepoError> {
        let tables = self.tables.read().await;
        let mut by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
        for &post_id in post_ids {
            let mut tags: Vec<Tag> = tables
                .tag_ids_of(post_id)
                .into_iter()
                .filter_map(|id| tables.tags.rows.get(&id).cloned())
                .collect();
            if tags.is_empty() {
                continue;
            }
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            by_post.insert(post_id, tags);
        }
        Ok(by_post)
    }

    async fn attach(&self, post_id: i64, tag_id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.rows.contains_key(&post_id) || !tables.tags.rows.contains_key(&tag_id) {
            return Err(RepoError::Constraint(format!(
                "cannot link post {post_id} to tag {tag_id}"
            )));
        }
        tables.post_tags.insert((post_id, tag_id));
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Author, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Author>, RepoError> {
        Ok(self.tables.read().await.authors.rows.get(&id).cloned())
    }

    async fn save(&self, mut author: Author) -> Result<Author, RepoError> {
        let mut tables = self.tables.write().await;
        author.id = tables.authors.assign_id(author.id);
        tables.authors.rows.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .authors
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

impl AuthorRepository for InMemoryBlogStore {}
