//! Recommend a post by email.

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::domain::ShareMessage;
use quill_core::ports::EmailMessage;
use quill_shared::dto::ShareResponse;
use quill_shared::{FormErrors, ShareForm};

use super::{FormBody, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Empty share form for a published post.
///
/// GET /blog/{post_id}/share
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = views::published_post(&state, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ShareResponse {
        post: views::post_with_tags(&state, &post).await?,
        form: ShareForm::default(),
        sent: false,
        errors: FormErrors::new(),
    }))
}

/// Validate the form and send one recommendation email.
///
/// An invalid form comes back with its errors and nothing is sent.
///
/// POST /blog/{post_id}/share
pub async fn share_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: FormBody<ShareForm>,
) -> AppResult<HttpResponse> {
    let post = views::published_post(&state, path.into_inner()).await?;
    let form = body.into_inner().cleaned();
    let post_response = views::post_with_tags(&state, &post).await?;

    if let Err(errors) = form.check() {
        tracing::debug!(post_id = post.id, "Share form rejected");
        return Ok(HttpResponse::Ok().json(ShareResponse {
            post: post_response,
            form,
            sent: false,
            errors,
        }));
    }

    let url = views::absolute_post_url(&req, &state, &post);
    let message = ShareMessage::compose(&post, &url, &form.name, &form.comments);
    state
        .mailer
        .send(EmailMessage::new(
            state.settings.mail_from.clone(),
            form.to.clone(),
            message.subject,
            message.body,
        ))
        .await?;

    tracing::info!(post_id = post.id, "Post recommended by email");

    Ok(HttpResponse::Ok().json(ShareResponse {
        post: post_response,
        form,
        sent: true,
        errors: FormErrors::new(),
    }))
}
