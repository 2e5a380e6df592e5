//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, Statement,
};

use quill_core::domain::{Comment, Post, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorRepository, CommentRepository, PostRepository, TagRepository};
use quill_core::query::{SearchHit, SearchQuery, SimilarPost};

use super::entity::author::Entity as AuthorEntity;
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

const POST_COLUMNS: &str =
    "p.id, p.author_id, p.title, p.slug, p.body, p.publish, p.created_at, p.updated_at, p.status";

/// Other published posts sharing tags with `$2`, by overlap then recency.
pub(crate) fn similar_posts_sql() -> String {
    format!(
        r#"SELECT {POST_COLUMNS}, COUNT(pt.tag_id) AS same_tags
FROM posts p
JOIN post_tags pt ON pt.post_id = p.id
WHERE p.status = $1
  AND p.id <> $2
  AND pt.tag_id IN (SELECT tag_id FROM post_tags WHERE post_id = $2)
GROUP BY p.id
ORDER BY same_tags DESC, p.publish DESC
LIMIT $3"#
    )
}

/// Title weighted A, body weighted B, ranked against a plain query in config `$1`.
fn search_sql() -> String {
    format!(
        r#"SELECT * FROM (
    SELECT {POST_COLUMNS},
        ts_rank(
            setweight(to_tsvector($1::regconfig, p.title), 'A')
                || setweight(to_tsvector($1::regconfig, p.body), 'B'),
            plainto_tsquery($1::regconfig, $2)
        ) AS rank
    FROM posts p
    WHERE p.status = $3
) ranked
WHERE rank >= $4
ORDER BY rank DESC, publish DESC"#
    )
}

fn published(tag_id: Option<i64>) -> Select<PostEntity> {
    let query = PostEntity::find().filter(post::Column::Status.eq(post::Status::Published));
    match tag_id {
        Some(tag_id) => query.filter(
            post::Column::Id.in_subquery(
                Query::select()
                    .column(post_tag::Column::PostId)
                    .from(PostTagEntity)
                    .and_where(post_tag::Column::TagId.eq(tag_id))
                    .to_owned(),
            ),
        ),
        None => query,
    }
}

fn status_value(status: post::Status) -> sea_orm::Value {
    use sea_orm::ActiveEnum;
    status.to_value().into()
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError> {
        published(tag_id).count(&self.db).await.map_err(map_db_err)
    }

    async fn list_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let rows = published(tag_id)
            .order_by_desc(post::Column::Publish)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_published(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let row = published(None)
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(Into::into))
    }

    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let row = published(None)
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start.fixed_offset()))
            .filter(post::Column::Publish.lt(end.fixed_offset()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(Into::into))
    }

    async fn similar(&self, post: &Post, limit: u64) -> Result<Vec<SimilarPost>, RepoError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            similar_posts_sql(),
            [
                status_value(post::Status::Published),
                post.id.into(),
                (limit as i64).into(),
            ],
        );

        let rows = self.db.query_all(stmt).await.map_err(map_db_err)?;
        rows.iter()
            .map(|row| {
                let model = post::Model::from_query_result(row, "")?;
                let same_tags: i64 = row.try_get("", "same_tags")?;
                Ok(SimilarPost {
                    post: model.into(),
                    same_tags: same_tags.max(0) as u64,
                })
            })
            .collect::<Result<Vec<_>, DbErr>>()
            .map_err(map_db_err)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, RepoError> {
        if query.is_blank() {
            return Ok(Vec::new());
        }
        tracing::debug!(language = %query.language, "Running full-text search");

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            search_sql(),
            [
                query.language.clone().into(),
                query.text.clone().into(),
                status_value(post::Status::Published),
                query.min_rank.into(),
            ],
        );

        let rows = self.db.query_all(stmt).await.map_err(map_db_err)?;
        rows.iter()
            .map(|row| {
                let model = post::Model::from_query_result(row, "")?;
                let rank: f32 = row.try_get("", "rank")?;
                Ok(SearchHit {
                    post: model.into(),
                    rank,
                })
            })
            .collect::<Result<Vec<_>, DbErr>>()
            .map_err(map_db_err)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let row = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(Into::into))
    }

    async fn tags_for_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Tag>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
            .find_also_related(TagEntity)
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (link, tag) in rows {
            if let Some(tag) = tag {
                by_post.entry(link.post_id).or_default().push(tag.into());
            }
        }
        Ok(by_post)
    }

    async fn attach(&self, post_id: i64, tag_id: i64) -> Result<(), RepoError> {
        let link = post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
        };

        let result = PostTagEntity::insert(link)
            .on_conflict(
                OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(map_db_err(e)),
        }
    }
}

impl AuthorRepository for PostgresAuthorRepository {}
