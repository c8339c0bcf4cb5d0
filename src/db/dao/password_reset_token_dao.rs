use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, TokenRecord, TokenStore};
use crate::db::entities::password_reset_token::{self, Entity as PasswordResetToken};

#[derive(Clone)]
pub struct PasswordResetTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for PasswordResetTokenDao {
    type Entity = PasswordResetToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TokenRecord for password_reset_token::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn subject(&self) -> Uuid {
        self.user_id
    }

    fn token_hash(&self) -> &str {
        &self.token_hash
    }

    fn expires_at(&self) -> DateTime<FixedOffset> {
        self.expires_at
    }
}

#[async_trait::async_trait]
impl TokenStore for PasswordResetTokenDao {
    type Record = password_reset_token::Model;

    async fn insert(
        &self,
        user_id: Uuid,
        token_hash: String,
        token_prefix: String,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<Self::Record> {
        self.create(password_reset_token::ActiveModel {
            user_id: Set(user_id),
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
        user_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<u64> {
        let result = PasswordResetToken::update_many()
            .col_expr(password_reset_token::Column::ExpiresAt, Expr::value(now))
            .filter(password_reset_token::Column::UserId.eq(user_id))
            .filter(password_reset_token::Column::UsedAt.is_null())
            .filter(password_reset_token::Column::ExpiresAt.gt(now))
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
        PasswordResetToken::find()
            .filter(password_reset_token::Column::TokenPrefix.eq(prefix))
            .filter(password_reset_token::Column::UsedAt.is_null())
            .filter(password_reset_token::Column::ExpiresAt.gt(now))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn find_without_prefix(&self, now: DateTime<FixedOffset>) -> DaoResult<Vec<Self::Record>> {
        PasswordResetToken::find()
            .filter(password_reset_token::Column::TokenPrefix.is_null())
            .filter(password_reset_token::Column::UsedAt.is_null())
            .filter(password_reset_token::Column::ExpiresAt.gt(now))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    async fn mark_used(&self, id: Uuid, now: DateTime<FixedOffset>) -> DaoResult<bool> {
        let result = PasswordResetToken::update_many()
            .col_expr(password_reset_token::Column::UsedAt, Expr::value(now))
            .filter(password_reset_token::Column::Id.eq(id))
            .filter(password_reset_token::Column::UsedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected == 1)
    }
}
