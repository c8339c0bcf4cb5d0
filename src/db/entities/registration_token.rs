use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(updated_at = false)]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registration_tokens")]
pub struct Model {
    #[sea_orm(indexed)]
    pub access_request_id: Uuid,
    #[sea_orm(unique)]
    pub token_hash: String,
    #[sea_orm(indexed)]
    pub token_prefix: Option<String>,
    pub expires_at: DateTimeWithTimeZone,
    pub used_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(belongs_to, from = "access_request_id", to = "id", on_delete = "Cascade")]
    pub access_request: HasOne<super::access_request::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
