use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slug::slugify;

/// Post visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    /// Two-letter code used in storage.
    pub fn code(self) -> &'static str {
        match self {
            PostStatus::Draft => "DF",
            PostStatus::Published => "PB",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DF" => Some(PostStatus::Draft),
            "PB" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

/// Post entity - a blog article.
///
/// `id` is 0 until the post has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    /// Create a new draft; the slug is derived from the title.
    pub fn new(author_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: 0,
            author_id,
            slug: slugify(&title),
            title,
            body: body.into(),
            publish: now,
            created_at: now,
            updated_at: now,
            status: PostStatus::Draft,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_publish(mut self, publish: DateTime<Utc>) -> Self {
        self.publish = publish;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Move a draft to published. Returns `false` if it was already published.
    ///
    /// The publish timestamp is kept as is (creation time unless set with `with_publish`),
    /// so the post's URL does not change.
    pub fn publish(&mut self) -> bool {
        if self.is_published() {
            return false;
        }
        self.status = PostStatus::Published;
        self.updated_at = Utc::now();
        true
    }

    /// Replace title and body. The slug is left alone so existing links keep working.
    pub fn edit(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.title = title.into();
        self.body = body.into();
        self.updated_at = Utc::now();
    }

    /// Calendar date (UTC) the slug is scoped to.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Two posts may not share a slug on the same publish date.
    pub fn slug_conflicts_with(&self, other: &Post) -> bool {
        self.id != other.id
            && self.slug == other.slug
            && self.publish_date() == other.publish_date()
    }

    /// Canonical path of the detail page.
    pub fn absolute_url(&self) -> String {
        format!(
            "/blog/{}/{}/{}/{}",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }
}
