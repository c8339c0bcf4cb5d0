use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "exercise_muscle_groups")]
pub struct Model {
    #[sea_orm(indexed)]
    pub exercise_id: Uuid,
    #[sea_orm(indexed)]
    pub muscle_group_id: Uuid,
    #[sea_orm(belongs_to, from = "exercise_id", to = "id", on_delete = "Cascade")]
    pub exercise: HasOne<super::exercise::Entity>,
    #[sea_orm(belongs_to, from = "muscle_group_id", to = "id", on_delete = "Restrict")]
    pub muscle_group: HasOne<super::muscle_group::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
