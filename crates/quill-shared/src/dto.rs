//! Data Transfer Objects - response bodies of the blog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::forms::{CommentForm, FormErrors, ShareForm};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A published post as readers see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub url: String,
    pub tags: Vec<TagResponse>,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

/// GET /blog and GET /blog/tag/{slug}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub tag: Option<TagResponse>,
    pub posts: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPostResponse {
    pub post: PostResponse,
    pub same_tags: u64,
}

/// GET /blog/{year}/{month}/{day}/{slug}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author: Option<String>,
    pub comments: Vec<CommentResponse>,
    pub similar_posts: Vec<SimilarPostResponse>,
    pub comment_form: CommentForm,
}

/// GET and POST /blog/{id}/share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub post: PostResponse,
    pub form: ShareForm,
    pub sent: bool,
    pub errors: FormErrors,
}

/// POST /blog/{id}/comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentSubmissionResponse {
    pub post: PostResponse,
    pub form: CommentForm,
    pub comment: Option<CommentResponse>,
    pub errors: FormErrors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultResponse {
    pub post: PostResponse,
    pub rank: f32,
}

/// GET /blog/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub results: Vec<SearchResultResponse>,
}
