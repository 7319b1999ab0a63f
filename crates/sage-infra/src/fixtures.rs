//! Store fixtures shared by the test modules.

use chrono::{Duration, Utc};
use sea_orm::DbConn;

use sage_core::domain::{Category, Post, Tag};
use sage_core::ports::{BaseRepository, PostRepository};

use crate::database::{
    SeaOrmCategoryRepository, SeaOrmPostRepository, SeaOrmTagRepository, Store,
};

pub(crate) async fn store() -> Store {
    Store::in_memory().await.expect("in-memory store")
}

pub(crate) async fn category(db: &DbConn, title: &str, is_published: bool) -> Category {
    let mut category = Category::new(title).unwrap();
    category.is_published = is_published;
    SeaOrmCategoryRepository::new(db.clone())
        .save(category)
        .await
        .unwrap()
}

pub(crate) async fn tag(db: &DbConn, title: &str, is_published: bool) -> Tag {
    let mut tag = Tag::new(title).unwrap();
    tag.is_published = is_published;
    SeaOrmTagRepository::new(db.clone()).save(tag).await.unwrap()
}

/// A post created `days_ago` days back.
pub(crate) async fn post(
    db: &DbConn,
    category_id: i32,
    title: &str,
    is_published: bool,
    days_ago: i64,
) -> Post {
    let mut post = Post::new(category_id, title, format!("Body of {title}")).unwrap();
    let created_at = Utc::now() - Duration::days(days_ago);
    post.is_published = is_published;
    post.created_at = created_at;
    post.published_at = created_at;
    post.updated_at = created_at;
    SeaOrmPostRepository::new(db.clone()).save(post).await.unwrap()
}

pub(crate) async fn post_with_body(
    db: &DbConn,
    category_id: i32,
    title: &str,
    description: &str,
) -> Post {
    let post = Post::new(category_id, title, description).unwrap();
    SeaOrmPostRepository::new(db.clone()).save(post).await.unwrap()
}

pub(crate) async fn tag_post(db: &DbConn, post_id: i32, tag_ids: &[i32]) {
    SeaOrmPostRepository::new(db.clone())
        .set_tags(post_id, tag_ids)
        .await
        .unwrap();
}
