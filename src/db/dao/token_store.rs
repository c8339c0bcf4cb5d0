use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use super::DaoResult;

/// A persisted single-use token row.
pub trait TokenRecord: Clone + Send + Sync {
    fn id(&self) -> Uuid;
    /// The row the token grants access to (access request or user).
    fn subject(&self) -> Uuid;
    fn token_hash(&self) -> &str;
    fn expires_at(&self) -> DateTime<FixedOffset>;
}

/// Storage operations shared by registration and password-reset tokens.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    type Record: TokenRecord;

    async fn insert(
        &self,
        subject: Uuid,
        token_hash: String,
        token_prefix: String,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<Self::Record>;

    /// Sets `expires_at = now` on unused, unexpired rows for `subject`.
    async fn expire_outstanding(&self, subject: Uuid, now: DateTime<FixedOffset>)
    -> DaoResult<u64>;

    async fn find_by_prefix(
        &self,
        prefix: &str,
        now: DateTime<FixedOffset>,
    ) -> DaoResult<Vec<Self::Record>>;

    /// Unused, unexpired rows issued before prefixes were stored.
    async fn find_without_prefix(&self, now: DateTime<FixedOffset>)
    -> DaoResult<Vec<Self::Record>>;

    /// Returns `false` when the row was already used.
    async fn mark_used(&self, id: Uuid, now: DateTime<FixedOffset>) -> DaoResult<bool>;
}
