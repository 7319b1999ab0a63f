use async_trait::async_trait;

use crate::domain::{Category, Faq, Post, Tag};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity: insert when it has no id yet, update otherwise.
    ///
    /// Updates never rewrite the slug.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to the rows it owns.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}

/// Post repository, including the many-to-many associations.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Replace the post's tags.
    async fn set_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<(), RepoError>;

    /// Replace the post's suggested posts. Suggestions are symmetric.
    async fn set_suggested(&self, post_id: i32, suggested_ids: &[i32]) -> Result<(), RepoError>;

    /// Replace the post's related posts. Relations point one way.
    async fn set_related(&self, post_id: i32, related_ids: &[i32]) -> Result<(), RepoError>;

    async fn suggested(&self, post_id: i32) -> Result<Vec<Post>, RepoError>;

    async fn related(&self, post_id: i32) -> Result<Vec<Post>, RepoError>;
}

/// FAQ repository.
#[async_trait]
pub trait FaqRepository: BaseRepository<Faq, i32> {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Faq>, RepoError>;
}
