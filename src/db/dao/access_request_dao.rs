use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::access_request::{self, AccessRequestStatus, Entity as AccessRequest};

#[derive(Clone)]
pub struct AccessRequestDao {
    db: DatabaseConnection,
}

impl DaoBase for AccessRequestDao {
    type Entity = AccessRequest;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AccessRequestDao {
    pub async fn create_pending(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> DaoResult<access_request::Model> {
        self.create(access_request::ActiveModel {
            email: Set(email.to_string()),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            status: Set(AccessRequestStatus::Pending),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            ..Default::default()
        })
        .await
    }

    /// Most recent request for `email`; older ones are history.
    pub async fn latest_for_email(&self, email: &str) -> DaoResult<Option<access_request::Model>> {
        let email = email.to_string();
        self.find_first(move |query| query.filter(access_request::Column::Email.eq(email)))
            .await
    }

    /// Every request, newest first.
    pub async fn list_all(&self) -> DaoResult<Vec<access_request::Model>> {
        self.find_iter(None, None, |query| query).collect_all().await
    }

    /// Moves a pending request to `status`. Returns `false` when the row was
    /// no longer pending.
    pub async fn review(
        &self,
        id: Uuid,
        status: AccessRequestStatus,
        reviewer_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<bool> {
        let result = AccessRequest::update_many()
            .col_expr(access_request::Column::Status, Expr::value(status))
            .col_expr(access_request::Column::ReviewedAt, Expr::value(now))
            .col_expr(access_request::Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(access_request::Column::UpdatedAt, Expr::value(now))
            .filter(access_request::Column::Id.eq(id))
            .filter(access_request::Column::Status.eq(AccessRequestStatus::Pending))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::{
        dao::DaoBase,
        entities::access_request::{self, AccessRequestStatus},
    };

    use super::AccessRequestDao;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn request_model(status: AccessRequestStatus, age_days: i64) -> access_request::Model {
        let created = ts() - Duration::days(age_days);
        access_request::Model {
            id: Uuid::new_v4(),
            created_at: created,
            updated_at: created,
            email: "new@example.com".to_string(),
            first_name: "New".to_string(),
            last_name: "Person".to_string(),
            status,
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    #[tokio::test]
    async fn create_pending_starts_unreviewed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[request_model(AccessRequestStatus::Pending, 0)]])
            .into_connection();
        let dao = AccessRequestDao::new(&db);

        let created = dao
            .create_pending("new@example.com", "New", "Person")
            .await
            .expect("insert should succeed");
        assert_eq!(created.status, AccessRequestStatus::Pending);
        assert!(created.reviewed_by.is_none());
    }

    #[tokio::test]
    async fn latest_for_email_returns_newest_row() {
        let newest = request_model(AccessRequestStatus::Rejected, 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![newest.clone()]])
            .into_connection();
        let dao = AccessRequestDao::new(&db);

        let latest = dao
            .latest_for_email("new@example.com")
            .await
            .expect("query should succeed");
        assert_eq!(latest.map(|row| row.id), Some(newest.id));
    }

    #[tokio::test]
    async fn review_only_succeeds_once() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let dao = AccessRequestDao::new(&db);
        let id = Uuid::new_v4();
        let admin = Uuid::new_v4();

        assert!(
            dao.review(id, AccessRequestStatus::Approved, admin, ts())
                .await
                .expect("update should run")
        );
        assert!(
            !dao.review(id, AccessRequestStatus::Rejected, admin, ts())
                .await
                .expect("update should run")
        );
    }
}
