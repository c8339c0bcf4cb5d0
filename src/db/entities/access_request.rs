use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl AccessRequestStatus {
    /// Admin listing order: open requests first.
    pub fn priority(self) -> u8 {
        match self {
            AccessRequestStatus::Pending => 0,
            AccessRequestStatus::Approved => 1,
            AccessRequestStatus::Rejected => 2,
        }
    }
}

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "access_requests")]
pub struct Model {
    #[sea_orm(indexed)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: AccessRequestStatus,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub reviewed_by: Option<Uuid>,
    #[sea_orm(belongs_to, from = "reviewed_by", to = "id", on_delete = "Restrict")]
    pub reviewer: HasOne<super::user::Entity>,
    #[sea_orm(has_many)]
    pub registration_tokens: HasMany<super::registration_token::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
