use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug_for;
use crate::error::DomainError;

/// Tag entity - many-to-many with posts, no ownership in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new, published, unsaved tag.
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let slug = slug_for("Tag", &title)?;
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

/// Tag annotated with the number of its published posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWithTotal {
    #[serde(flatten)]
    pub tag: Tag,
    pub total_posts: i64,
}

/// Tag with a usage count, as produced by trend and popularity ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub posts_count: i64,
}
