//! Domain entities - the blog's content records and their annotated views.

mod category;
mod faq;
mod post;
mod tag;

pub use category::{Category, CategoryWithTotal};
pub use faq::Faq;
pub use post::{
    NEW_POST_DAYS, Post, PostFilter, PostWithAge, PostWithNeighbours, PostWithRecency,
    PostWithTagCount,
};
pub use tag::{Tag, TagWithCount, TagWithTotal};

use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;
use crate::slug::slugify;

/// The instant `days` days before `now`, or `None` when it is not representable.
pub fn days_before(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|window| now.checked_sub_signed(window))
}

/// Derive a slug for a new record, rejecting titles that slugify to nothing.
pub(crate) fn slug_for(entity_type: &'static str, title: &str) -> Result<String, DomainError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(DomainError::Validation(format!(
            "{entity_type} title `{title}` does not produce a usable slug"
        )));
    }
    Ok(slug)
}
