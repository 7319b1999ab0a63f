//! Schema derived from the entities.
//!
//! Shared by the migrator and by in-memory stores so both build the exact
//! same tables, foreign keys and cascades.

use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, EntityName, Schema};

use super::entity::{category, faq, post, post_related, post_suggested, post_tag, tag};

/// Table statements in dependency order.
pub fn table_statements(backend: DbBackend) -> Vec<TableCreateStatement> {
    let schema = Schema::new(backend);
    vec![
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(tag::Entity),
        schema.create_table_from_entity(post::Entity),
        schema.create_table_from_entity(post_tag::Entity),
        schema.create_table_from_entity(post_suggested::Entity),
        schema.create_table_from_entity(post_related::Entity),
        schema.create_table_from_entity(faq::Entity),
    ]
    .into_iter()
    .map(|mut stmt| stmt.if_not_exists().to_owned())
    .collect()
}

/// Secondary indexes backing the filters and rankings.
pub fn index_statements() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_sage_post_category_id")
            .table(post::Entity)
            .col(post::Column::CategoryId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_sage_post_created_at")
            .table(post::Entity)
            .col(post::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_sage_post_tags_tag_id")
            .table(post_tag::Entity)
            .col(post_tag::Column::TagId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_sage_post_faqs_post_id")
            .table(faq::Entity)
            .col(faq::Column::PostId)
            .if_not_exists()
            .to_owned(),
    ]
}

/// Postgres-only statements: the trigram extension and its GIN indexes.
pub fn trigram_statements() -> Vec<String> {
    let table = post::Entity.table_name();
    vec![
        "CREATE EXTENSION IF NOT EXISTS pg_trgm".to_string(),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_title_trgm ON {table} USING gin (title gin_trgm_ops)"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_description_trgm ON {table} USING gin (description gin_trgm_ops)"
        ),
    ]
}

/// Create every table and index on the given connection.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for stmt in table_statements(backend) {
        db.execute(backend.build(&stmt)).await?;
    }
    for stmt in index_statements() {
        db.execute(backend.build(&stmt)).await?;
    }

    tracing::debug!(?backend, "Blog schema created");
    Ok(())
}
