use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::feedback::{self, Entity as Feedback, FeedbackType, StoredFiles};

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: Option<Uuid>,
    pub feedback_type: FeedbackType,
    pub url: String,
    pub title: String,
    pub description: String,
    pub files: StoredFiles,
}

#[derive(Clone)]
pub struct FeedbackDao {
    db: DatabaseConnection,
}

impl DaoBase for FeedbackDao {
    type Entity = Feedback;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl FeedbackDao {
    pub async fn create_feedback(&self, new_feedback: NewFeedback) -> DaoResult<feedback::Model> {
        self.create(feedback::ActiveModel {
            user_id: Set(new_feedback.user_id),
            feedback_type: Set(new_feedback.feedback_type),
            url: Set(new_feedback.url),
            title: Set(new_feedback.title),
            description: Set(new_feedback.description),
            files: Set(new_feedback.files),
            ..Default::default()
        })
        .await
    }
}
