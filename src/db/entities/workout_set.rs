use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum WeightUnit {
    #[sea_orm(string_value = "kg")]
    Kg,
    #[sea_orm(string_value = "lb")]
    Lb,
}

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sets")]
pub struct Model {
    #[sea_orm(indexed)]
    pub workout_exercise_id: Uuid,
    /// 1-based.
    pub set_number: i32,
    pub reps: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub weight: Option<Decimal>,
    pub unit: Option<WeightUnit>,
    pub notes: Option<String>,
    #[sea_orm(belongs_to, from = "workout_exercise_id", to = "id", on_delete = "Cascade")]
    pub workout_exercise: HasOne<super::workout_exercise::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
