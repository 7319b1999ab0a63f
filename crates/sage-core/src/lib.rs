//! # Sage Core
//!
//! The domain layer of the Sage blog.
//! Entities, slug derivation, ranking parameter validation and the search
//! contracts live here, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod ranking;
pub mod search;
pub mod slug;

pub use error::{DomainError, QueryError, RepoError};
pub use search::{Capabilities, SearchTerm};
