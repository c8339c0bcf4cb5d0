use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{dao::MuscleGroupDao, entities::muscle_group},
    error::AppError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuscleGroupView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<muscle_group::Model> for MuscleGroupView {
    fn from(model: muscle_group::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Clone)]
pub struct MuscleGroupService {
    groups: MuscleGroupDao,
}

impl MuscleGroupService {
    pub fn new(groups: MuscleGroupDao) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<MuscleGroupView>, AppError> {
        let groups = self.groups.list_by_name().await?;
        Ok(groups.into_iter().map(MuscleGroupView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::{
        db::entities::muscle_group,
        services::test_support::{TestServices, ts},
    };

    #[tokio::test]
    async fn lists_groups_as_views() {
        let chest = muscle_group::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            name: "chest".to_string(),
            description: "Pectoral muscles".to_string(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[chest.clone()]])
            .into_connection();
        let services = TestServices::new(db);

        let groups = services
            .context
            .muscle_groups()
            .list()
            .await
            .expect("listing succeeds");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, chest.id);
        assert_eq!(groups[0].name, "chest");
    }
}
