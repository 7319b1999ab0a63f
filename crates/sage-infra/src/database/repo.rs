//! Repository implementations.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, TransactionTrait,
};

use sage_core::domain::{Category, Faq, Post, Tag};
use sage_core::error::RepoError;
use sage_core::ports::{CategoryRepository, FaqRepository, PostRepository, TagRepository};

use super::base::SeaOrmRepository;
use super::entity::{category, faq, post, post_related, post_suggested, post_tag, tag};
use super::repo_err;

pub type SeaOrmCategoryRepository = SeaOrmRepository<category::Entity>;

pub type SeaOrmTagRepository = SeaOrmRepository<tag::Entity>;

pub type SeaOrmPostRepository = SeaOrmRepository<post::Entity>;

pub type SeaOrmFaqRepository = SeaOrmRepository<faq::Entity>;

/// Unique ids, minus the owner itself.
fn distinct_ids(owner: i32, ids: &[i32]) -> Vec<i32> {
    ids.iter()
        .copied()
        .filter(|id| *id != owner)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}

impl SeaOrmPostRepository {
    async fn posts_linked_from(
        &self,
        links: sea_orm::sea_query::SelectStatement,
    ) -> Result<Vec<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::Id.in_subquery(links))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

async fn insert_pairs<E, A>(txn: &DatabaseTransaction, rows: Vec<A>) -> Result<(), RepoError>
where
    E: EntityTrait<ActiveModel = A>,
    E::Model: IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + Send,
{
    if rows.is_empty() {
        return Ok(());
    }
    E::insert_many(rows)
        .exec_without_returning(txn)
        .await
        .map_err(repo_err)?;
    Ok(())
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug, "Finding post by slug");

        let result = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn set_tags(&self, post_id: i32, tag_ids: &[i32]) -> Result<(), RepoError> {
        let tag_ids: BTreeSet<i32> = tag_ids.iter().copied().collect();
        let txn = self.db.begin().await.map_err(repo_err)?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        let rows = tag_ids
            .into_iter()
            .map(|tag_id| post_tag::link(post_id, tag_id))
            .collect();
        insert_pairs::<post_tag::Entity, _>(&txn, rows).await?;

        txn.commit().await.map_err(repo_err)?;
        Ok(())
    }

    async fn set_suggested(&self, post_id: i32, suggested_ids: &[i32]) -> Result<(), RepoError> {
        let others = distinct_ids(post_id, suggested_ids);
        let txn = self.db.begin().await.map_err(repo_err)?;

        post_suggested::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(post_suggested::Column::FromPostId.eq(post_id))
                    .add(post_suggested::Column::ToPostId.eq(post_id)),
            )
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        let rows = others
            .iter()
            .flat_map(|&other| {
                [
                    post_suggested::link(post_id, other),
                    post_suggested::link(other, post_id),
                ]
            })
            .collect();
        insert_pairs::<post_suggested::Entity, _>(&txn, rows).await?;

        txn.commit().await.map_err(repo_err)?;
        Ok(())
    }

    async fn set_related(&self, post_id: i32, related_ids: &[i32]) -> Result<(), RepoError> {
        let others = distinct_ids(post_id, related_ids);
        let txn = self.db.begin().await.map_err(repo_err)?;

        post_related::Entity::delete_many()
            .filter(post_related::Column::FromPostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(repo_err)?;

        let rows = others
            .into_iter()
            .map(|other| post_related::link(post_id, other))
            .collect();
        insert_pairs::<post_related::Entity, _>(&txn, rows).await?;

        txn.commit().await.map_err(repo_err)?;
        Ok(())
    }

    async fn suggested(&self, post_id: i32) -> Result<Vec<Post>, RepoError> {
        self.posts_linked_from(
            Query::select()
                .column(post_suggested::Column::ToPostId)
                .from(post_suggested::Entity)
                .and_where(post_suggested::Column::FromPostId.eq(post_id))
                .to_owned(),
        )
        .await
    }

    async fn related(&self, post_id: i32) -> Result<Vec<Post>, RepoError> {
        self.posts_linked_from(
            Query::select()
                .column(post_related::Column::ToPostId)
                .from(post_related::Entity)
                .and_where(post_related::Column::FromPostId.eq(post_id))
                .to_owned(),
        )
        .await
    }
}

#[async_trait]
impl FaqRepository for SeaOrmFaqRepository {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Faq>, RepoError> {
        let result = faq::Entity::find()
            .filter(faq::Column::PostId.eq(post_id))
            .order_by_asc(faq::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
