use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

use quill_core::domain::{Comment, Post, PostStatus};
use quill_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};
use quill_core::query::SearchQuery;

use crate::database::entity::{comment, post, post_tag, tag};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository, similar_posts_sql,
};

fn post_model(id: i64, slug: &str, status: post::Status) -> post::Model {
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
    post::Model {
        id,
        author_id: 1,
        title: format!("Post {id}"),
        slug: slug.to_owned(),
        body: "Body".to_owned(),
        publish: at.into(),
        created_at: at.into(),
        updated_at: at.into(),
        status,
    }
}

fn tag_model(id: i64, name: &str) -> tag::Model {
    tag::Model {
        id,
        name: name.to_owned(),
        slug: name.to_owned(),
    }
}

/// A raw result row: the post columns plus one computed column.
fn post_row(model: &post::Model, extra: (&'static str, Value)) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("id", model.id.into()),
        ("author_id", model.author_id.into()),
        ("title", model.title.clone().into()),
        ("slug", model.slug.clone().into()),
        ("body", model.body.clone().into()),
        ("publish", model.publish.into()),
        ("created_at", model.created_at.into()),
        ("updated_at", model.updated_at.into()),
        ("status", "PB".into()),
        extra,
    ])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(5, "test-post", post::Status::Draft)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(5).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Post 5");
    assert_eq!(post.id, 5);
    assert_eq!(post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_find_published_by_date_filters_status_slug_and_day() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(
            5,
            "hello-world",
            post::Status::Published,
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    let post = repo
        .find_published_by_date(date, "hello-world")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post.slug, "hello-world");

    let log = repo.db.into_transaction_log();
    let sql = log[0].statements()[0].sql.clone();
    assert!(sql.contains(r#""posts"."status" = $1"#), "{sql}");
    assert!(sql.contains(r#""posts"."slug" = $2"#), "{sql}");
    assert!(sql.contains(r#""posts"."publish" >= $3"#), "{sql}");
    assert!(sql.contains(r#""posts"."publish" < $4"#), "{sql}");
}

#[tokio::test]
async fn test_list_published_by_tag_uses_join_table() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(9, "newer", post::Status::Published),
            post_model(4, "older", post::Status::Published),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.list_published(Some(2), 3, 3).await.unwrap();
    assert_eq!(posts.len(), 2);

    let log = repo.db.into_transaction_log();
    let sql = log[0].statements()[0].sql.clone();
    assert!(sql.contains(r#"FROM "post_tags""#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "posts"."publish" DESC"#), "{sql}");
    assert!(sql.contains("LIMIT $3 OFFSET $4"), "{sql}");
}

#[tokio::test]
async fn test_similar_reads_shared_tag_count() {
    let row = post_row(
        &post_model(7, "flask-intro", post::Status::Published),
        ("same_tags", 1i64.into()),
    );
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let mut source = Post::new(1, "Django intro", "...");
    source.id = 5;

    let similar = repo.similar(&source, 4).await.unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].post.id, 7);
    assert_eq!(similar[0].same_tags, 1);

    let log = repo.db.into_transaction_log();
    assert_eq!(
        log,
        vec![Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            similar_posts_sql(),
            ["PB".into(), 5i64.into(), 4i64.into()],
        )]
    );
}

#[tokio::test]
async fn test_search_reads_rank_and_binds_language() {
    let row = post_row(
        &post_model(3, "ownership", post::Status::Published),
        ("rank", 0.6f32.into()),
    );
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let hits = repo
        .search(&SearchQuery::new("borrow checker").with_language("simple"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!((hits[0].rank - 0.6).abs() < f32::EPSILON);

    let log = repo.db.into_transaction_log();
    let stmt = &log[0].statements()[0];
    assert!(stmt.sql.contains("ts_rank"));
    let values = stmt.values.as_ref().unwrap();
    assert_eq!(values.0[0], Value::from("simple"));
    assert_eq!(values.0[1], Value::from("borrow checker"));
    assert_eq!(values.0[3], Value::from(0.3f32));
}

#[tokio::test]
async fn test_blank_search_skips_the_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    let hits = repo.search(&SearchQuery::new("   ")).await.unwrap();
    assert!(hits.is_empty());
    assert!(repo.db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_active_comments_only() {
    let at = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: 1,
            post_id: 5,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Great".to_owned(),
            created_at: at.into(),
            updated_at: at.into(),
            active: true,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.active_for_post(5).await.unwrap();
    assert_eq!(comments.len(), 1);

    let log = repo.db.into_transaction_log();
    let sql = log[0].statements()[0].sql.clone();
    assert!(sql.contains(r#""comments"."active" = $2"#), "{sql}");
}

#[tokio::test]
async fn test_save_new_comment_inserts() {
    let at = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: 11,
            post_id: 5,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Great".to_owned(),
            created_at: at.into(),
            updated_at: at.into(),
            active: true,
        }]])
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 11,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let saved = repo
        .save(Comment::new(5, "Ann", "ann@example.com", "Great"))
        .await
        .unwrap();
    assert_eq!(saved.id, 11);

    let log = repo.db.into_transaction_log();
    assert!(log[0].statements()[0].sql.starts_with(r#"INSERT INTO "comments""#));
}

#[tokio::test]
async fn test_tags_for_posts_groups_by_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            (
                post_tag::Model { post_id: 5, tag_id: 1 },
                tag_model(1, "django"),
            ),
            (
                post_tag::Model { post_id: 5, tag_id: 2 },
                tag_model(2, "python"),
            ),
            (
                post_tag::Model { post_id: 7, tag_id: 2 },
                tag_model(2, "python"),
            ),
        ]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let tags = repo.tags_for_posts(&[5, 7, 8]).await.unwrap();
    assert_eq!(tags[&5].len(), 2);
    assert_eq!(tags[&7][0].slug, "python");
    assert!(!tags.contains_key(&8));
}

#[tokio::test]
async fn test_tags_for_no_posts_skips_the_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresTagRepository::new(db);
    assert!(repo.tags_for_posts(&[]).await.unwrap().is_empty());
}
