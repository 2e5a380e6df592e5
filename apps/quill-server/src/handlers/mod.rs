//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod search;
mod share;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Form submissions accepted as JSON or as a urlencoded HTML form.
pub type FormBody<T> = web::Either<web::Json<T>, web::Form<T>>;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .service(
            web::scope("/blog")
                .route("", web::get().to(posts::post_list))
                .route("/", web::get().to(posts::post_list))
                .route("/search", web::get().to(search::post_search))
                .route("/tag/{tag_slug}", web::get().to(posts::post_list_by_tag))
                .route(
                    "/{year}/{month}/{day}/{slug}",
                    web::get().to(posts::post_detail),
                )
                .service(
                    web::resource("/{post_id}/share")
                        .route(web::get().to(share::share_form))
                        .route(web::post().to(share::share_post)),
                )
                // Comments are POST only; other methods get 405.
                .service(
                    web::resource("/{post_id}/comment").route(web::post().to(comments::post_comment)),
                ),
        );
}
