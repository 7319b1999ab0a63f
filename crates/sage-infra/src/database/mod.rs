//! Store access: connection handle, capability probe, schema, repositories.

mod base;
mod capabilities;
mod connections;
mod repo;
pub mod schema;

pub mod entity;

pub use base::{Persistable, SeaOrmRepository};
pub use capabilities::{for_backend, probe};
pub use connections::{DatabaseConfig, Store};
pub use repo::{
    SeaOrmCategoryRepository, SeaOrmFaqRepository, SeaOrmPostRepository, SeaOrmTagRepository,
};

use sea_orm::{DbErr, SqlErr};

use sage_core::RepoError;

/// Map a SeaORM error onto the repository taxonomy.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    if let Some(sql) = err.sql_err() {
        return match sql {
            SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg) => {
                RepoError::Constraint(msg)
            }
            _ => RepoError::Query(err.to_string()),
        };
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}
