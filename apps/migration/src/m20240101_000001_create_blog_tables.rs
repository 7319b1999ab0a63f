use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};

use sage_infra::database::entity::{
    category, faq, post, post_related, post_suggested, post_tag, tag,
};
use sage_infra::database::schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        for stmt in schema::table_statements(backend) {
            manager.create_table(stmt).await?;
        }
        for stmt in schema::index_statements() {
            manager.create_index(stmt).await?;
        }

        if backend == DbBackend::Postgres {
            let db = manager.get_connection();
            for sql in schema::trigram_statements() {
                db.execute_unprepared(&sql).await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order: join tables and FAQs before posts.
        let drops = [
            Table::drop().table(faq::Entity).if_exists().to_owned(),
            Table::drop().table(post_related::Entity).if_exists().to_owned(),
            Table::drop().table(post_suggested::Entity).if_exists().to_owned(),
            Table::drop().table(post_tag::Entity).if_exists().to_owned(),
            Table::drop().table(post::Entity).if_exists().to_owned(),
            Table::drop().table(tag::Entity).if_exists().to_owned(),
            Table::drop().table(category::Entity).if_exists().to_owned(),
        ];
        for stmt in drops {
            manager.drop_table(stmt).await?;
        }
        Ok(())
    }
}
