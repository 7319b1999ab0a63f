use actix_web::{App, test, web};
use serde_json::Value;

use sage_core::domain::{Category, Post, Tag};
use sage_core::ports::{BaseRepository, PostRepository};
use sage_infra::Store;
use sage_infra::database::{SeaOrmCategoryRepository, SeaOrmPostRepository, SeaOrmTagRepository};

use super::configure_routes;
use crate::config::BlogSettings;
use crate::state::AppState;

/// One published category with two published posts tagged `rust`, plus a
/// draft in the same category.
async fn blog_state() -> AppState {
    let store = Store::in_memory().await.unwrap();
    let conn = store.conn().clone();

    let category = SeaOrmCategoryRepository::new(conn.clone())
        .save(Category::new("News").unwrap())
        .await
        .unwrap();
    let tag = SeaOrmTagRepository::new(conn.clone())
        .save(Tag::new("Rust").unwrap())
        .await
        .unwrap();

    let posts = SeaOrmPostRepository::new(conn);
    for (title, body) in [
        ("First Steps", "Getting started with ownership"),
        ("Second Look", "Borrowing revisited"),
    ] {
        let post = posts
            .save(Post::new(category.id, title, body).unwrap())
            .await
            .unwrap();
        posts.set_tags(post.id, &[tag.id]).await.unwrap();
    }
    let mut draft = Post::new(category.id, "Draft Notes", "Unfinished").unwrap();
    draft.is_published = false;
    posts.save(draft).await.unwrap();

    AppState::from_store(store, BlogSettings::default())
}

async fn get_json(state: AppState, uri: &str) -> (u16, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_health_reports_search_features() {
    let (status, body) = get_json(blog_state().await, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["search"]["full_text"], false);
    assert_eq!(body["search"]["trigram"], false);
}

#[actix_web::test]
async fn test_list_posts_hides_drafts() {
    let (status, body) = get_json(blog_state().await, "/api/posts").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["items"][0]["slug"], "first-steps");
    assert_eq!(body["data"]["items"][0]["is_recent"], true);
}

#[actix_web::test]
async fn test_list_posts_filters_and_searches() {
    let state = blog_state().await;

    let (_, body) = get_json(state.clone(), "/api/posts?cat=news&tag=rust").await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = get_json(state.clone(), "/api/posts?cat=missing").await;
    assert_eq!(body["data"]["total"], 0);

    let (_, body) = get_json(state, "/api/posts?search=BORROWING").await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["slug"], "second-look");
}

#[actix_web::test]
async fn test_post_detail() {
    let (status, body) = get_json(blog_state().await, "/api/posts/first-steps").await;
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["category"]["slug"], "news");
    assert_eq!(data["tags"][0]["slug"], "rust");
    assert_eq!(data["next_post_slug"], "second-look");
    assert_eq!(data["prev_post_slug"], Value::Null);
    assert_eq!(data["reading_time"], 1);
    assert_eq!(data["days_since_published"], 0);
}

#[actix_web::test]
async fn test_post_detail_hides_drafts_and_unknown_slugs() {
    let state = blog_state().await;
    let (status, body) = get_json(state.clone(), "/api/posts/draft-notes").await;
    assert_eq!(status, 404);
    assert_eq!(body["status"], 404);

    let (status, _) = get_json(state, "/api/posts/nope").await;
    assert_eq!(status, 404);
}

#[actix_web::test]
async fn test_trending_tags() {
    let state = blog_state().await;
    let (status, body) = get_json(state.clone(), "/api/tags/trending?days_ago=0&min_count=2").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["slug"], "rust");
    assert_eq!(body["data"][0]["posts_count"], 2);

    let (_, body) = get_json(state, "/api/tags/trending?days_ago=0&min_count=3").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_invalid_ranking_arguments_are_bad_requests() {
    let state = blog_state().await;
    let (status, body) = get_json(state.clone(), "/api/tags/trending?min_count=0").await;
    assert_eq!(status, 400);
    assert_eq!(body["parameter"], "min_count");

    let (status, body) = get_json(state, "/api/tags/recent?days_ago=-1").await;
    assert_eq!(status, 400);
    assert_eq!(body["parameter"], "days_ago");
}

#[actix_web::test]
async fn test_oversized_ranking_window_is_bad_request() {
    let state = blog_state().await;
    for uri in [
        "/api/tags/trending?days_ago=100000000&min_count=1",
        "/api/tags/recent?days_ago=100000000",
    ] {
        let (status, body) = get_json(state.clone(), uri).await;
        assert_eq!(status, 400, "{uri}");
        assert_eq!(body["parameter"], "days_ago");
    }
}

#[actix_web::test]
async fn test_page_far_past_the_end_is_empty() {
    let state = blog_state().await;
    for page in [u64::MAX, i64::MAX as u64, 3] {
        let (status, body) = get_json(state.clone(), &format!("/api/posts?page={page}")).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["page"], page);
    }
}

#[actix_web::test]
async fn test_recent_tags() {
    let (status, body) = get_json(blog_state().await, "/api/tags/recent?days_ago=0&limit=5").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["slug"], "rust");
    assert!(body["data"][0].get("posts_count").is_none());
}

#[actix_web::test]
async fn test_categories_count_published_posts() {
    let (status, body) = get_json(blog_state().await, "/api/categories").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["slug"], "news");
    assert_eq!(body["data"][0]["total_posts"], 2);
}

#[actix_web::test]
async fn test_sidebar() {
    let (status, body) = get_json(blog_state().await, "/api/sidebar").await;
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["categories"].as_array().unwrap().len(), 1);
    assert_eq!(data["recent_posts"].as_array().unwrap().len(), 2);
    assert_eq!(data["recent_posts"][0]["slug"], "second-look");
    assert_eq!(data["tags"][0]["posts_count"], 2);
}
