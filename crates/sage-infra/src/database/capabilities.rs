//! Search capability probe.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

use sage_core::Capabilities;

/// Capabilities a backend offers out of the box.
///
/// Postgres ships linguistic full-text search; trigram similarity needs the
/// `pg_trgm` extension, which `probe` verifies.
pub fn for_backend(backend: DbBackend) -> Capabilities {
    match backend {
        DbBackend::Postgres => Capabilities {
            full_text: true,
            trigram: true,
        },
        _ => Capabilities::basic(),
    }
}

/// Probe the optional search features of a live store.
pub async fn probe<C: ConnectionTrait>(db: &C) -> Result<Capabilities, DbErr> {
    let backend = db.get_database_backend();
    let mut capabilities = for_backend(backend);

    if backend == DbBackend::Postgres {
        let installed = db
            .query_one(Statement::from_string(
                backend,
                "SELECT 1 FROM pg_extension WHERE extname = 'pg_trgm'",
            ))
            .await?
            .is_some();

        if !installed {
            tracing::warn!(
                hint = "Run `CREATE EXTENSION pg_trgm;` in your database",
                "pg_trgm extension is not installed, trigram search disabled"
            );
            capabilities.trigram = false;
        }
    } else {
        tracing::warn!(
            ?backend,
            "Store is not PostgreSQL, search falls back to substring matching only"
        );
    }

    tracing::info!(
        full_text = capabilities.full_text,
        trigram = capabilities.trigram,
        "Search capabilities probed"
    );

    Ok(capabilities)
}
