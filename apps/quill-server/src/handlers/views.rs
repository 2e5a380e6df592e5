//! Domain to response conversions shared by the blog handlers.

use std::collections::HashMap;

use actix_web::HttpRequest;
use quill_core::Page;
use quill_core::domain::{Comment, Post, Tag};
use quill_core::error::DomainError;
use quill_shared::dto::{CommentResponse, PageResponse, PostResponse, TagResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub fn tag_response(tag: &Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        created_at: comment.created_at,
    }
}

pub fn post_response(post: &Post, tags: &[Tag]) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        author_id: post.author_id,
        body: post.body.clone(),
        publish: post.publish,
        url: post.absolute_url(),
        tags: tags.iter().map(tag_response).collect(),
    }
}

pub fn page_response<T>(page: Page<T>) -> PageResponse<T> {
    PageResponse {
        page: page.number,
        num_pages: page.num_pages,
        total: page.total,
        has_previous: page.has_previous(),
        has_next: page.has_next(),
        previous_page: page.previous_number(),
        next_page: page.next_number(),
        items: page.items,
    }
}

/// Tags of every post in `posts`, fetched in one round trip.
pub async fn tags_of(state: &AppState, posts: &[&Post]) -> AppResult<HashMap<i64, Vec<Tag>>> {
    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    Ok(state.tags.tags_for_posts(&ids).await?)
}

pub async fn post_with_tags(state: &AppState, post: &Post) -> AppResult<PostResponse> {
    let tags = tags_of(state, &[post]).await?;
    Ok(post_response(post, tags.get(&post.id).map(Vec::as_slice).unwrap_or_default()))
}

/// A published post by id; drafts and unknown ids are both not found.
pub async fn published_post(state: &AppState, post_id: i64) -> AppResult<Post> {
    state
        .posts
        .find_published(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id).into())
}

/// Absolute URL of `post`, from the configured base or the request's scheme and host.
pub fn absolute_post_url(req: &HttpRequest, state: &AppState, post: &Post) -> String {
    match &state.settings.public_base_url {
        Some(base) => format!("{}{}", base, post.absolute_url()),
        None => {
            let info = req.connection_info();
            format!("{}://{}{}", info.scheme(), info.host(), post.absolute_url())
        }
    }
}
