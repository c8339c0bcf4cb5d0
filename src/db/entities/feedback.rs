use base_entity_derive::base_entity;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    #[sea_orm(string_value = "feedback")]
    Feedback,
    #[sea_orm(string_value = "feature")]
    Feature,
}

impl FeedbackType {
    pub fn issue_label(self) -> &'static str {
        match self {
            FeedbackType::Feedback => "Feedback",
            FeedbackType::Feature => "Feature Request",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub original_name: String,
    /// Location on disk relative to the server's working directory.
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StoredFiles(pub Vec<StoredFile>);

#[base_entity(updated_at = false)]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(indexed)]
    pub user_id: Option<Uuid>,
    #[sea_orm(column_name = "type")]
    pub feedback_type: FeedbackType,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub files: StoredFiles,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "SetNull")]
    pub user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
