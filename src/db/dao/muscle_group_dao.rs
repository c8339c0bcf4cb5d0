use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::muscle_group::{self, Entity as MuscleGroup};

#[derive(Clone)]
pub struct MuscleGroupDao {
    db: DatabaseConnection,
}

impl DaoBase for MuscleGroupDao {
    type Entity = MuscleGroup;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl MuscleGroupDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<muscle_group::Model>> {
        let name = name.to_string();
        self.find_first(move |query| query.filter(muscle_group::Column::Name.eq(name)))
            .await
    }

    pub async fn create_group(
        &self,
        name: &str,
        description: &str,
    ) -> DaoResult<muscle_group::Model> {
        self.create(muscle_group::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn list_by_name(&self) -> DaoResult<Vec<muscle_group::Model>> {
        self.find_iter(
            None,
            Some((muscle_group::Column::Name, Order::Asc)),
            |query| query,
        )
        .collect_all()
        .await
    }
}
