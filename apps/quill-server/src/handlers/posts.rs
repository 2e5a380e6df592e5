//! Post listing and detail endpoints.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use quill_core::domain::{Post, Tag};
use quill_core::error::DomainError;
use quill_core::pagination::{POSTS_PER_PAGE, Paginator};
use quill_core::query::SIMILAR_POSTS_LIMIT;
use quill_shared::CommentForm;
use quill_shared::dto::{PostDetailResponse, PostListResponse, SimilarPostResponse};

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Kept raw: anything that is not an integer falls back to page 1.
    pub page: Option<String>,
}

/// Published posts, newest first, three per page.
///
/// GET /blog?page=N
pub async fn post_list(
    state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    list(&state, None, params.page.as_deref()).await
}

/// Published posts carrying one tag.
///
/// GET /blog/tag/{tag_slug}?page=N
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let tag_slug = path.into_inner();
    let tag = state
        .tags
        .find_by_slug(&tag_slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Tag", &tag_slug))?;

    list(&state, Some(tag), params.page.as_deref()).await
}

async fn list(state: &AppState, tag: Option<Tag>, raw_page: Option<&str>) -> AppResult<HttpResponse> {
    let tag_id = tag.as_ref().map(|t| t.id);

    let total = state.posts.count_published(tag_id).await?;
    let paginator = Paginator::new(total, POSTS_PER_PAGE);
    let number = paginator.resolve(raw_page);

    let posts = state
        .posts
        .list_published(tag_id, paginator.offset(number), paginator.limit())
        .await?;
    let refs: Vec<&Post> = posts.iter().collect();
    let tags = views::tags_of(state, &refs).await?;

    let page = paginator.page(number, posts).map(|post| {
        let post_tags = tags.get(&post.id).map(Vec::as_slice).unwrap_or_default();
        views::post_response(&post, post_tags)
    });

    Ok(HttpResponse::Ok().json(PostListResponse {
        tag: tag.as_ref().map(views::tag_response),
        posts: views::page_response(page),
    }))
}

/// A published post with its active comments and similar posts.
///
/// GET /blog/{year}/{month}/{day}/{slug}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let not_found = || DomainError::not_found("Post", format!("{year}/{month}/{day}/{slug}"));

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(not_found)?;
    let post = state
        .posts
        .find_published_by_date(date, &slug)
        .await?
        .ok_or_else(not_found)?;

    let comments = state.comments.active_for_post(post.id).await?;
    let similar = state.posts.similar(&post, SIMILAR_POSTS_LIMIT).await?;
    let author = state
        .authors
        .find_by_id(post.author_id)
        .await?
        .map(|a| a.username);

    let mut shown: Vec<&Post> = vec![&post];
    shown.extend(similar.iter().map(|s| &s.post));
    let tags = views::tags_of(&state, &shown).await?;
    let tags_for = |p: &Post| tags.get(&p.id).map(Vec::as_slice).unwrap_or_default();

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: views::post_response(&post, tags_for(&post)),
        author,
        comments: comments.iter().map(views::comment_response).collect(),
        similar_posts: similar
            .iter()
            .map(|s| SimilarPostResponse {
                post: views::post_response(&s.post, tags_for(&s.post)),
                same_tags: s.same_tags,
            })
            .collect(),
        comment_form: CommentForm::default(),
    }))
}
