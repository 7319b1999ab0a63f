use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, EntityTrait, IntoActiveModel, PrimaryKeyTrait,
};

use sage_core::domain::{Category, Faq, Post, Tag};
use sage_core::error::RepoError;
use sage_core::ports::BaseRepository;

use super::repo_err;

/// Domain records that know whether they have been stored yet.
pub trait Persistable {
    fn is_unsaved(&self) -> bool;
}

impl Persistable for Category {
    fn is_unsaved(&self) -> bool {
        self.is_new()
    }
}

impl Persistable for Tag {
    fn is_unsaved(&self) -> bool {
        self.is_new()
    }
}

impl Persistable for Post {
    fn is_unsaved(&self) -> bool {
        self.is_new()
    }
}

impl Persistable for Faq {
    fn is_unsaved(&self) -> bool {
        self.is_new()
    }
}

/// Generic SeaORM repository over one entity with an integer key.
pub struct SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, i32> for SeaOrmRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    T: From<E::Model> + Into<E::ActiveModel> + Persistable + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let is_new = entity.is_unsaved();
        let active_model: E::ActiveModel = entity.into();

        let model = if is_new {
            active_model.insert(&self.db).await
        } else {
            active_model.update(&self.db).await
        }
        .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
