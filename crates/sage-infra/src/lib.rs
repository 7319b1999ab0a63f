//! # Sage Infrastructure
//!
//! Store-backed implementations of the Sage blog:
//!
//! - `database` - SeaORM entities, schema, store handle, capability probe and
//!   repositories
//! - `query` - deferred query builders for posts, categories and tags
//!   (visibility, relationship filters, annotations, tag ranking)
//! - `search` - search strategies and the fallback chain
//! - `generator` - bulk data generation for demos and load tests

pub mod database;
pub mod generator;
pub mod query;
pub mod search;

#[cfg(test)]
mod fixtures;

pub use database::{DatabaseConfig, Store};
pub use generator::{DataGenerator, GeneratorConfig, GeneratorError};
pub use query::{Annotated, CategoryQuery, PostQuery, TagQuery};
pub use search::{SearchChain, SearchStrategy};
