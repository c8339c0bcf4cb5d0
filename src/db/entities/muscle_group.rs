use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(updated_at = false)]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "muscle_groups")]
pub struct Model {
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
}

impl ActiveModelBehavior for ActiveModel {}
