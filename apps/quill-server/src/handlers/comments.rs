//! Reader comments.

use actix_web::{HttpResponse, web};

use quill_core::domain::Comment;
use quill_shared::CommentForm;
use quill_shared::dto::CommentSubmissionResponse;

use super::{FormBody, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Add a comment to a published post. Only POST is routed here.
///
/// POST /blog/{post_id}/comment
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: FormBody<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = views::published_post(&state, path.into_inner()).await?;
    let form = body.into_inner().cleaned();
    let post_response = views::post_with_tags(&state, &post).await?;

    if let Err(errors) = form.check() {
        return Ok(HttpResponse::UnprocessableEntity().json(CommentSubmissionResponse {
            post: post_response,
            form,
            comment: None,
            errors,
        }));
    }

    let comment = state
        .comments
        .save(Comment::new(post.id, &form.name, &form.email, &form.body))
        .await?;
    tracing::info!(post_id = post.id, comment_id = comment.id, "Comment added");

    Ok(HttpResponse::Created().json(CommentSubmissionResponse {
        post: post_response,
        form,
        comment: Some(views::comment_response(&comment)),
        errors: Default::default(),
    }))
}
