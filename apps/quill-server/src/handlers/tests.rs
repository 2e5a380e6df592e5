use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use quill_core::domain::{Author, Comment, Post, Tag};
use quill_core::ports::{BaseRepository, Mailer, TagRepository};
use quill_infra::{InMemoryBlogStore, OutboxMailer};

use super::configure_routes;
use crate::config::BlogSettings;
use crate::state::AppState;

struct Blog {
    store: Arc<InMemoryBlogStore>,
    django: Post,
    draft: Post,
}

impl Blog {
    fn state(&self, mailer: Arc<dyn Mailer>) -> AppState {
        let settings = BlogSettings {
            public_base_url: Some("https://blog.test".to_string()),
            ..BlogSettings::default()
        };
        AppState::in_memory(self.store.clone(), mailer, settings)
    }
}

async fn publish(store: &InMemoryBlogStore, title: &str, body: &str, day: u32, tags: &[&Tag]) -> Post {
    let at = Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
    let mut post = Post::new(1, title, body).with_publish(at);
    post.publish();
    let post = BaseRepository::<Post, i64>::save(store, post).await.unwrap();
    for tag in tags {
        store.attach(post.id, tag.id).await.unwrap();
    }
    post
}

/// Four published posts (two on python, two on rust), one draft, and two comments
/// on the Django post of which only one is active.
async fn seed() -> Blog {
    let store = Arc::new(InMemoryBlogStore::new());
    BaseRepository::<Author, i64>::save(&*store, Author::new("admin", "admin@quill.test"))
        .await
        .unwrap();

    let mut tags = Vec::new();
    for name in ["python", "django", "flask", "rust"] {
        tags.push(BaseRepository::<Tag, i64>::save(&*store, Tag::new(name)).await.unwrap());
    }
    let [python, django, flask, rust] = [&tags[0], &tags[1], &tags[2], &tags[3]];

    let django_post =
        publish(&store, "Django intro", "Getting started with views", 10, &[python, django]).await;
    publish(&store, "Flask intro", "A small framework", 11, &[python, flask]).await;
    publish(&store, "Borrowing rules", "Ownership and borrowing in Rust", 12, &[rust]).await;
    publish(&store, "Async Rust", "Futures and executors", 13, &[rust]).await;

    let draft = BaseRepository::<Post, i64>::save(&*store, Post::new(1, "Unfinished", "wip"))
        .await
        .unwrap();

    let ann = Comment::new(django_post.id, "Ann", "ann@quill.test", "Very clear, thanks");
    BaseRepository::<Comment, i64>::save(&*store, ann).await.unwrap();
    let mut spam = Comment::new(django_post.id, "Spam", "spam@quill.test", "buy now");
    spam.deactivate();
    BaseRepository::<Comment, i64>::save(&*store, spam).await.unwrap();

    Blog {
        store,
        django: django_post,
        draft,
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn titles(posts: &Value) -> Vec<&str> {
    posts["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect()
}

#[actix_web::test]
async fn test_health_reports_memory_storage() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_list_is_paginated_newest_first() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let posts = &body["posts"];
    assert_eq!(titles(posts), vec!["Async Rust", "Borrowing rules", "Flask intro"]);
    assert_eq!(posts["page"], 1);
    assert_eq!(posts["num_pages"], 2);
    assert_eq!(posts["total"], 4);
    assert_eq!(posts["has_next"], true);
    assert_eq!(posts["next_page"], 2);
    assert!(body["tag"].is_null());
}

#[actix_web::test]
async fn test_page_out_of_range_shows_last_page() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    for uri in ["/blog?page=99", "/blog?page=0", "/blog?page=-3"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["page"], 2, "{uri}");
        assert_eq!(titles(&body["posts"]), vec!["Django intro"], "{uri}");
    }
}

#[actix_web::test]
async fn test_non_numeric_page_shows_first_page() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog?page=abc").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"]["page"], 1);
    assert_eq!(body["posts"]["has_previous"], false);
}

#[actix_web::test]
async fn test_list_by_tag() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog/tag/python").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["tag"]["slug"], "python");
    assert_eq!(titles(&body["posts"]), vec!["Flask intro", "Django intro"]);
    assert_eq!(body["posts"]["num_pages"], 1);

    let req = test::TestRequest::get().uri("/blog/tag/haskell").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_detail_shows_active_comments_and_similar_posts() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri(&blog.django.absolute_url()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["post"]["title"], "Django intro");
    assert_eq!(body["author"], "admin");
    let tags: Vec<&str> = body["post"]["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["slug"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["django", "python"]);

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["name"], "Ann");

    let similar = body["similar_posts"].as_array().unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0]["post"]["title"], "Flask intro");
    assert_eq!(similar[0]["same_tags"], 1);
    assert_eq!(body["comment_form"]["name"], "");
}

#[actix_web::test]
async fn test_detail_hides_drafts_and_wrong_dates() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    for uri in [
        blog.draft.absolute_url(),
        "/blog/2024/5/11/django-intro".to_string(),
        "/blog/2024/2/30/django-intro".to_string(),
        "/blog/2024/may/10/django-intro".to_string(),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_comment_is_saved_and_listed() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/comment", blog.django.id))
        .set_form([("name", "Bob"), ("email", "bob@quill.test"), ("body", " Nice post ")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["comment"]["name"], "Bob");
    assert_eq!(body["comment"]["body"], "Nice post");

    let req = test::TestRequest::get().uri(&blog.django.absolute_url()).to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["comments"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_invalid_comment_is_echoed_with_errors() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/comment", blog.django.id))
        .set_json(json!({ "name": "Bob", "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["comment"].is_null());
    assert_eq!(body["form"]["name"], "Bob");
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["body"].is_array());
    assert!(body["errors"].get("name").is_none());
}

#[actix_web::test]
async fn test_comment_rejects_get_and_drafts() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}/comment", blog.django.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/comment", blog.draft.id))
        .set_json(json!({ "name": "Bob", "email": "bob@quill.test", "body": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_share_form_starts_empty() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}/share", blog.django.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sent"], false);
    assert_eq!(body["form"]["to"], "");
    assert_eq!(body["post"]["title"], "Django intro");
}

#[actix_web::test]
async fn test_share_sends_one_recommendation() {
    let blog = seed().await;
    let outbox = Arc::new(OutboxMailer::new());
    let app = app!(blog.state(outbox.clone()));

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share", blog.django.id))
        .set_json(json!({
            "name": "Ann",
            "email": "ann@quill.test",
            "to": "friend@quill.test",
            "comments": "You will like this"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sent"], true);

    let sent = outbox.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["friend@quill.test".to_string()]);
    assert_eq!(sent[0].from, "noreply@quillpost.local");
    assert_eq!(sent[0].subject, "Ann recommends you read Django intro");
    assert!(sent[0].body.contains("https://blog.test/blog/2024/5/10/django-intro"));
    assert!(sent[0].body.contains("Ann's comments: You will like this"));
}

#[actix_web::test]
async fn test_invalid_share_sends_nothing() {
    let blog = seed().await;
    let outbox = Arc::new(OutboxMailer::new());
    let app = app!(blog.state(outbox.clone()));

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share", blog.django.id))
        .set_json(json!({ "name": "Ann", "email": "ann@quill.test", "to": "nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sent"], false);
    assert!(body["errors"]["to"].is_array());
    assert!(outbox.sent().await.is_empty());
}

#[actix_web::test]
async fn test_share_reports_mail_failure() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::failing())));

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share", blog.django.id))
        .set_json(json!({
            "name": "Ann",
            "email": "ann@quill.test",
            "to": "friend@quill.test"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 502);
}

#[actix_web::test]
async fn test_share_unknown_post_is_not_found() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog/999/share").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_search_ranks_title_matches_first() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog/search?query=rust").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["query"], "rust");
    let results: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["post"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(results, vec!["Async Rust", "Borrowing rules"]);
}

#[actix_web::test]
async fn test_search_without_matches_or_query() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog/search?query=zebra").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["query"], "zebra");
    assert!(body["results"].as_array().unwrap().is_empty());

    for uri in ["/blog/search", "/blog/search?query=%20%20"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["query"].is_null(), "{uri}");
        assert!(body["results"].as_array().unwrap().is_empty(), "{uri}");
    }
}

#[actix_web::test]
async fn test_search_echoes_trimmed_query() {
    let blog = seed().await;
    let app = app!(blog.state(Arc::new(OutboxMailer::new())));

    let req = test::TestRequest::get().uri("/blog/search?query=%20rust%20").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["query"], "rust");
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_drafts_are_not_searchable_or_shareable() {
    let blog = seed().await;
    let outbox = Arc::new(OutboxMailer::new());
    let app = app!(blog.state(outbox.clone()));

    let req = test::TestRequest::get().uri("/blog/search?query=unfinished").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["results"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/blog/search?query=wip").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["results"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}/share", blog.draft.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{}/share", blog.draft.id))
        .set_json(json!({
            "name": "Ann",
            "email": "ann@quill.test",
            "to": "friend@quill.test"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(outbox.sent().await.is_empty());
}
