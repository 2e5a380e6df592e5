//! Full-text post search.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::domain::Post;
use quill_core::query::SearchQuery;
use quill_shared::dto::{SearchResponse, SearchResultResponse};

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// Published posts ranked against `query`, best match first.
///
/// Without a query, or with a blank one, the page is just the empty search form.
///
/// GET /blog/search?query=...
pub async fn post_search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let submitted = params.into_inner().query.map(|q| q.trim().to_string());
    let Some(text) = submitted.filter(|q| !q.is_empty()) else {
        return Ok(HttpResponse::Ok().json(SearchResponse {
            query: None,
            results: Vec::new(),
        }));
    };

    let query = SearchQuery::new(text.as_str()).with_language(&state.settings.search_language);
    let hits = state.posts.search(&query).await?;
    tracing::debug!(hits = hits.len(), "Search completed");

    let posts: Vec<&Post> = hits.iter().map(|h| &h.post).collect();
    let tags = views::tags_of(&state, &posts).await?;

    let results = hits
        .iter()
        .map(|hit| SearchResultResponse {
            post: views::post_response(
                &hit.post,
                tags.get(&hit.post.id).map(Vec::as_slice).unwrap_or_default(),
            ),
            rank: hit.rank,
        })
        .collect();

    Ok(HttpResponse::Ok().json(SearchResponse {
        query: Some(text),
        results,
    }))
}
