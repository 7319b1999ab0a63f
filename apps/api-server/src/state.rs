//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::DbErr;

use sage_core::ports::{FaqRepository, PostRepository};
use sage_infra::database::{SeaOrmFaqRepository, SeaOrmPostRepository};
use sage_infra::{DatabaseConfig, Store};

use crate::config::BlogSettings;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub posts: Arc<dyn PostRepository>,
    pub faqs: Arc<dyn FaqRepository>,
    pub blog: BlogSettings,
}

impl AppState {
    /// Connect to the configured store, or fall back to an in-memory one.
    pub async fn new(
        db_config: Option<&DatabaseConfig>,
        auto_migrate: bool,
        blog: BlogSettings,
    ) -> Result<Self, DbErr> {
        let store = match db_config {
            Some(config) => {
                let store = Store::connect(config).await?;
                if auto_migrate {
                    Migrator::up(store.conn(), None).await?;
                    tracing::info!("Schema migrations applied");
                    // Migrations may have installed search extensions.
                    Store::from_connection(store.conn().clone()).await?
                } else {
                    store
                }
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running on an empty in-memory store.");
                Store::in_memory().await?
            }
        };

        tracing::info!("Application state initialized");
        Ok(Self::from_store(store, blog))
    }

    pub fn from_store(store: Store, blog: BlogSettings) -> Self {
        let conn = store.conn().clone();
        Self {
            posts: Arc::new(SeaOrmPostRepository::new(conn.clone())),
            faqs: Arc::new(SeaOrmFaqRepository::new(conn)),
            store,
            blog,
        }
    }
}
