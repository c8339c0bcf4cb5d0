use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// `user_id = None` marks a built-in exercise shared by every user.
#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,
    #[sea_orm(has_many)]
    pub muscle_groups: HasMany<super::exercise_muscle_group::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
