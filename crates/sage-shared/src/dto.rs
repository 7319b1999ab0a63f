//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query string of the post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsParams {
    /// Free-text search. Blank means no search.
    pub search: Option<String>,
    /// Category slug.
    pub cat: Option<String>,
    /// Tag slug.
    pub tag: Option<String>,
    /// One-based page number.
    pub page: Option<u64>,
}

/// Post as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub is_recent: bool,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRef {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqResponse {
    pub question: String,
    pub answer: String,
}

/// A single post with everything its page needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: String,
    pub category: CategoryRef,
    pub tags: Vec<TagRef>,
    pub faqs: Vec<FaqResponse>,
    pub is_recent: bool,
    pub days_since_published: i64,
    /// Estimated reading time in minutes.
    pub reading_time: usize,
    pub next_post_slug: Option<String>,
    pub prev_post_slug: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub total_posts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    /// Posts counted by the ranking that produced this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<i64>,
}

/// Blocks rendered next to every blog page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidebarResponse {
    pub categories: Vec<CategoryResponse>,
    pub recent_posts: Vec<PostSummary>,
    pub tags: Vec<TagResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCapabilitiesResponse {
    pub full_text: bool,
    pub trigram: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub search: SearchCapabilitiesResponse,
}
