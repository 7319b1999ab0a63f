use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug_for;
use crate::error::DomainError;

/// Category entity - owns zero or more posts.
///
/// Deleting a category deletes its posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, published, unsaved category.
    ///
    /// The id stays `0` until the store assigns one.
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let slug = slug_for("Category", &title)?;
        let now = Utc::now();
        Ok(Self {
            id: 0,
            title,
            slug,
            is_published: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

/// Category annotated with the number of its published posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithTotal {
    #[serde(flatten)]
    pub category: Category,
    pub total_posts: i64,
}
