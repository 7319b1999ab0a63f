use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{days_before, slug_for};
use crate::error::DomainError;

/// Window, in days, inside which a post counts as new or recent.
pub const NEW_POST_DAYS: i64 = 7;

/// Longest summary accepted, in characters.
const SUMMARY_MAX_CHARS: usize = 140;

/// Average reading speed, in words per minute.
const WORDS_PER_MINUTE: usize = 265;

/// Post entity - a blog article.
///
/// A post always belongs to exactly one category. Tags, suggested posts and
/// related posts are stored as join rows and are not part of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub category_id: i32,
    /// Opaque id of the author in the host application's user table.
    pub author_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, published, unsaved post in the given category.
    pub fn new(
        category_id: i32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let slug = slug_for("Post", &title)?;
        let now = Utc::now();
        Ok(Self {
            id: 0,
            category_id,
            author_id: None,
            title,
            slug,
            summary: None,
            description: description.into(),
            is_published: true,
            published_at: now,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach a summary, enforcing the length limit.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Result<Self, DomainError> {
        let summary = summary.into();
        if summary.chars().count() > SUMMARY_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "Post summary exceeds {SUMMARY_MAX_CHARS} characters"
            )));
        }
        self.summary = Some(summary);
        Ok(self)
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// Estimated reading time of the description, in whole minutes (at least one).
    pub fn reading_time(&self) -> usize {
        self.description
            .split_whitespace()
            .count()
            .div_ceil(WORDS_PER_MINUTE)
            .max(1)
    }

    /// Whether the post was created within `days` days before `now`.
    pub fn is_recent_at(&self, now: DateTime<Utc>, days: i64) -> bool {
        match days_before(now, days) {
            Some(threshold) => self.created_at >= threshold,
            None => days > 0,
        }
    }

    /// Whole days between publication and `now`.
    pub fn days_since_published_at(&self, now: DateTime<Utc>) -> i64 {
        (now - self.published_at).num_days()
    }
}

/// Slug filters a consumer passes alongside a listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Tag slug.
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tag.is_none()
    }
}

/// Post annotated with the number of its tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithTagCount {
    #[serde(flatten)]
    pub post: Post,
    pub tags_count: i64,
}

/// Post annotated with the whole days elapsed since publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAge {
    #[serde(flatten)]
    pub post: Post,
    pub days_since_published: i64,
}

/// Post annotated with whether it was created inside the recency window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithRecency {
    #[serde(flatten)]
    pub post: Post,
    pub is_recent: bool,
}

/// Post annotated with its neighbours inside the same category, by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithNeighbours {
    #[serde(flatten)]
    pub post: Post,
    pub next_post_slug: Option<String>,
    pub prev_post_slug: Option<String>,
}
