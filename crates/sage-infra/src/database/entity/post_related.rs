//! Related posts. One direction only: `from_post_id` lists `to_post_id`.

use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sage_post_related")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub from_post_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub to_post_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::FromPostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    FromPost,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::ToPostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ToPost,
}

impl ActiveModelBehavior for ActiveModel {}

/// Join row pointing `from_post_id` at `to_post_id`.
pub fn link(from_post_id: i32, to_post_id: i32) -> ActiveModel {
    ActiveModel {
        from_post_id: Set(from_post_id),
        to_post_id: Set(to_post_id),
    }
}
