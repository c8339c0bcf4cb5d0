use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_exercises")]
pub struct Model {
    #[sea_orm(indexed)]
    pub workout_id: Uuid,
    #[sea_orm(indexed)]
    pub exercise_id: Uuid,
    /// 1-based order within the workout.
    pub position: i32,
    pub notes: Option<String>,
    #[sea_orm(belongs_to, from = "workout_id", to = "id", on_delete = "Cascade")]
    pub workout: HasOne<super::workout::Entity>,
    #[sea_orm(belongs_to, from = "exercise_id", to = "id", on_delete = "Restrict")]
    pub exercise: HasOne<super::exercise::Entity>,
    #[sea_orm(has_many)]
    pub sets: HasMany<super::workout_set::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
