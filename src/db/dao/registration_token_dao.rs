use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, TokenRecord, TokenStore};
use crate::db::entities::registration_token::{self, Entity as RegistrationToken};

#[derive(Clone)]
pub struct RegistrationTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for RegistrationTokenDao {
    type Entity = RegistrationToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TokenRecord for registration_token::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn subject(&self) -> Uuid {
        self.access_request_id
    }

    fn token_hash(&self) -> &str {
        &self.token_hash
    }

    fn expires_at(&self) -> DateTime<FixedOffset> {
        self.expires_at
    }
}

#[async_trait::async_trait]
impl TokenStore for RegistrationTokenDao {
    type Record = registration_token::Model;

    async fn insert(
        &self,
        access_request_id: Uuid,
        token_hash: String,
        token_prefix: String,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<Self::Record> {
        self.create(registration_token::ActiveModel {
            access_request_id: Set(access_request_id),
            token_hash: Set(token_hash),
            token_prefix: Set(Some(token_prefix)),
            expires_at: Set(expires_at),
            used_at: Set(None),
            ..Default::default()
        })
        .await
    }

    async fn expire_outstanding(
        &self,
        access_request_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<u64> {
        let result = RegistrationToken::update_many()
            .col_expr(registration_token::Column::ExpiresAt, Expr::value(now))
            .filter(registration_token::Column::AccessRequestId.eq(access_request_id))
            .filter(registration_token::Column::UsedAt.is_null())
            .filter(registration_token::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    async fn find_by_prefix(
        &self,
        prefix: &str,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<Vec<Self::Record>> {
        RegistrationToken::find()
            .filter(registration_token::Column::TokenPrefix.eq(prefix))
            .filter(registration_token::Column::UsedAt.is_null())
            .filter(registration_token::Column::ExpiresAt.gt(now))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn find_without_prefix(&self, now: DateTime<FixedOffset>) -> DaoResult<Vec<Self::Record>> {
        RegistrationToken::find()
            .filter(registration_token::Column::TokenPrefix.is_null())
            .filter(registration_token::Column::UsedAt.is_null())
            .filter(registration_token::Column::ExpiresAt.gt(now))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<FixedOffset>) -> DaoResult<bool> {
        Self::mark_used_with(&self.db, id, now).await
    }
}

impl RegistrationTokenDao {
    /// Conditional `used_at` stamp on any connection, so registration can
    /// run it inside the same transaction as the user insert.
    pub async fn mark_used_with<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<bool> {
        let result = RegistrationToken::update_many()
            .col_expr(registration_token::Column::UsedAt, Expr::value(now))
            .filter(registration_token::Column::Id.eq(id))
            .filter(registration_token::Column::UsedAt.is_null())
            .exec(conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::{
        dao::{DaoBase, DaoLayerError, TokenRecord, TokenStore},
        entities::registration_token,
    };

    use super::RegistrationTokenDao;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn token_model(access_request_id: Uuid, prefix: Option<&str>) -> registration_token::Model {
        registration_token::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            access_request_id,
            token_hash: "$argon2id$hash".to_string(),
            token_prefix: prefix.map(str::to_string),
            expires_at: ts() + Duration::days(7),
            used_at: None,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn insert_stores_prefix_and_returns_row() {
        let request_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[token_model(request_id, Some("abcdefghijkl"))]])
            .into_connection();
        let dao = RegistrationTokenDao::new(&db);

        let row = dao
            .insert(
                request_id,
                "$argon2id$hash".to_string(),
                "abcdefghijkl".to_string(),
                ts() + Duration::days(7),
            )
            .await
            .expect("insert should succeed");
        assert_eq!(row.subject(), request_id);
        assert_eq!(row.token_prefix.as_deref(), Some("abcdefghijkl"));
    }

    #[tokio::test]
    async fn find_by_prefix_returns_candidates() {
        let request_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                token_model(request_id, Some("abcdefghijkl")),
                token_model(request_id, Some("abcdefghijkl")),
            ]])
            .into_connection();
        let dao = RegistrationTokenDao::new(&db);

        let rows = dao
            .find_by_prefix("abcdefghijkl", ts())
            .await
            .expect("query should succeed");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn mark_used_reports_lost_race() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let dao = RegistrationTokenDao::new(&db);
        let id = Uuid::new_v4();

        assert!(dao.mark_used(id, ts()).await.expect("update should run"));
        assert!(!dao.mark_used(id, ts()).await.expect("update should run"));
    }

    #[tokio::test]
    async fn expire_outstanding_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("update failed".to_string())])
            .into_connection();
        let dao = RegistrationTokenDao::new(&db);

        let err = dao
            .expire_outstanding(Uuid::new_v4(), ts())
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
