//! FAQ entity for SeaORM.

use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;

use sage_core::domain::Faq;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sage_post_faqs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub post_id: i32,
    pub question: String,
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Faq {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            question: model.question,
            answer: model.answer,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Faq> for ActiveModel {
    fn from(faq: Faq) -> Self {
        Self {
            id: if faq.is_new() { NotSet } else { Unchanged(faq.id) },
            post_id: Set(faq.post_id),
            question: Set(faq.question),
            answer: Set(faq.answer),
            created_at: Set(faq.created_at.into()),
            updated_at: Set(faq.updated_at.into()),
        }
    }
}
