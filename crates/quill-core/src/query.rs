//! Query shapes shared by every post store: similar-post ranking and search results.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::Post;

/// Maximum number of similar posts shown under a post.
pub const SIMILAR_POSTS_LIMIT: u64 = 4;

/// Minimum relevance a search hit must reach to be returned.
pub const SEARCH_MIN_RANK: f32 = 0.3;

/// Text search configuration used when none is configured.
pub const DEFAULT_SEARCH_LANGUAGE: &str = "english";

/// A published post that shares tags with another post.
#[derive(Debug, Clone)]
pub struct SimilarPost {
    pub post: Post,
    pub same_tags: u64,
}

/// A post matched by full-text search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub post: Post,
    pub rank: f32,
}

/// Full-text search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub language: String,
    pub min_rank: f32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_SEARCH_LANGUAGE.to_string(),
            min_rank: SEARCH_MIN_RANK,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Rank `candidates` by tags shared with `source_tags`.
///
/// The source post and candidates without a shared tag are dropped. Order is shared tag
/// count descending, then publish date descending.
pub fn rank_similar<I>(
    source_id: i64,
    source_tags: &[i64],
    candidates: I,
    limit: u64,
) -> Vec<SimilarPost>
where
    I: IntoIterator<Item = (Post, Vec<i64>)>,
{
    let wanted: HashSet<i64> = source_tags.iter().copied().collect();
    let mut ranked: Vec<SimilarPost> = candidates
        .into_iter()
        .filter(|(post, _)| post.id != source_id && post.is_published())
        .filter_map(|(post, tags)| {
            let same_tags = tags.iter().filter(|t| wanted.contains(t)).count() as u64;
            (same_tags > 0).then_some(SimilarPost { post, same_tags })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.same_tags
            .cmp(&a.same_tags)
            .then_with(|| b.post.publish.cmp(&a.post.publish))
    });
    ranked.truncate(limit as usize);
    ranked
}

/// Drop hits below `min_rank` and order the rest by rank, newest first on ties.
pub fn order_search_hits(mut hits: Vec<SearchHit>, min_rank: f32) -> Vec<SearchHit> {
    hits.retain(|h| h.rank >= min_rank);
    hits.sort_by(|a, b| {
        b.rank
            .partial_cmp(&a.rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.post.publish.cmp(&a.post.publish))
    });
    hits
}
