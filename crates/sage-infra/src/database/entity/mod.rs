//! SeaORM entities.

pub mod category;
pub mod faq;
pub mod post;
pub mod post_related;
pub mod post_suggested;
pub mod post_tag;
pub mod tag;
