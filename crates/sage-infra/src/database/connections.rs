use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use sage_core::Capabilities;

use super::{capabilities, schema};

/// Configuration for the blog store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Explicit store handle passed to every query.
///
/// Pairs the connection pool with the optional search features the store
/// offers, probed once when the handle is built.
#[derive(Debug, Clone)]
pub struct Store {
    conn: DbConn,
    capabilities: Capabilities,
}

impl Store {
    /// Open a connection pool from configuration and probe its capabilities.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing blog store connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            "Blog store connected (pool: {})",
            config.max_connections
        );

        Self::from_connection(conn).await
    }

    /// Wrap an existing connection.
    pub async fn from_connection(conn: DbConn) -> Result<Self, DbErr> {
        let capabilities = capabilities::probe(&conn).await?;
        Ok(Self { conn, capabilities })
    }

    /// Isolated in-memory SQLite store with the blog schema in place.
    ///
    /// The pool is pinned to a single connection: every SQLite `:memory:`
    /// connection is its own database.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let opts = ConnectOptions::new("sqlite::memory:")
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false)
            .to_owned();

        let conn = Database::connect(opts).await?;
        schema::create_schema(&conn).await?;
        Self::from_connection(conn).await
    }

    pub fn conn(&self) -> &DbConn {
        &self.conn
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}
