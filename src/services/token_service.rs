use chrono::{DateTime, Duration, FixedOffset, Utc};
use uuid::Uuid;

use crate::{
    auth::tokens,
    db::dao::{TokenRecord, TokenStore},
    error::AppError,
};

pub const REGISTRATION_TOKEN_TTL_HOURS: i64 = 7 * 24;
pub const PASSWORD_RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Issues, verifies and redeems single-use emailed tokens over a
/// [`TokenStore`]. Each issue invalidates the subject's earlier tokens.
#[derive(Clone)]
pub struct TokenService<S> {
    store: S,
    ttl: Duration,
}

impl<S: TokenStore> TokenService<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn issue(&self, subject: Uuid) -> Result<String, AppError> {
        self.issue_at(subject, Utc::now().fixed_offset()).await
    }

    pub async fn verify(&self, token: &str) -> Result<S::Record, AppError> {
        self.verify_at(token, Utc::now().fixed_offset()).await
    }

    pub async fn consume(&self, record: &S::Record) -> Result<(), AppError> {
        self.consume_at(record, Utc::now().fixed_offset()).await
    }

    pub async fn redeem(&self, token: &str) -> Result<S::Record, AppError> {
        self.redeem_at(token, Utc::now().fixed_offset()).await
    }

    /// Returns the plaintext token; only its digest and prefix are stored.
    pub async fn issue_at(
        &self,
        subject: Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<String, AppError> {
        let issued = tokens::generate()?;
        self.store.expire_outstanding(subject, now).await?;
        self.store
            .insert(subject, issued.hash, issued.prefix, now + self.ttl)
            .await?;
        Ok(issued.token)
    }

    pub async fn verify_at(
        &self,
        token: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<S::Record, AppError> {
        let prefix = tokens::prefix_of(token).ok_or_else(AppError::invalid_token)?;

        let candidates = self.store.find_by_prefix(prefix, now).await?;
        if let Some(record) = first_match(candidates, token, now) {
            return Ok(record);
        }

        let legacy = self.store.find_without_prefix(now).await?;
        first_match(legacy, token, now).ok_or_else(AppError::invalid_token)
    }

    /// Marks a verified record used. Fails if another request got there first.
    pub async fn consume_at(
        &self,
        record: &S::Record,
        now: DateTime<FixedOffset>,
    ) -> Result<(), AppError> {
        if self.store.mark_used(record.id(), now).await? {
            Ok(())
        } else {
            Err(AppError::invalid_token())
        }
    }

    pub async fn redeem_at(
        &self,
        token: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<S::Record, AppError> {
        let record = self.verify_at(token, now).await?;
        self.consume_at(&record, now).await?;
        Ok(record)
    }
}

fn first_match<R: TokenRecord>(
    candidates: Vec<R>,
    token: &str,
    now: DateTime<FixedOffset>,
) -> Option<R> {
    candidates.into_iter().find(|record| {
        !tokens::is_expired(record.expires_at(), now) && tokens::matches(token, record.token_hash())
    })
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use chrono::{DateTime, FixedOffset};
    use uuid::Uuid;

    use crate::db::dao::{DaoResult, TokenRecord, TokenStore};

    #[derive(Debug, Clone)]
    pub struct FakeToken {
        pub id: Uuid,
        pub subject: Uuid,
        pub token_hash: String,
        pub token_prefix: Option<String>,
        pub expires_at: DateTime<FixedOffset>,
        pub used_at: Option<DateTime<FixedOffset>>,
    }

    impl TokenRecord for FakeToken {
        fn id(&self) -> Uuid {
            self.id
        }

        fn subject(&self) -> Uuid {
            self.subject
        }

        fn token_hash(&self) -> &str {
            &self.token_hash
        }

        fn expires_at(&self) -> DateTime<FixedOffset> {
            self.expires_at
        }
    }

    /// In-memory stand-in applying the same filters as the SQL queries.
    #[derive(Default)]
    pub struct FakeTokenStore {
        pub rows: Mutex<Vec<FakeToken>>,
    }

    impl FakeTokenStore {
        pub fn rows(&self) -> Vec<FakeToken> {
            self.rows.lock().expect("lock").clone()
        }

        fn outstanding(row: &FakeToken, now: DateTime<FixedOffset>) -> bool {
            row.used_at.is_none() && row.expires_at > now
        }
    }

    #[async_trait::async_trait]
    impl TokenStore for FakeTokenStore {
        type Record = FakeToken;

        async fn insert(
            &self,
            subject: Uuid,
            token_hash: String,
            token_prefix: String,
            expires_at: DateTime<FixedOffset>,
        ) -> DaoResult<FakeToken> {
            let row = FakeToken {
                id: Uuid::new_v4(),
                subject,
                token_hash,
                token_prefix: Some(token_prefix),
                expires_at,
                used_at: None,
            };
            self.rows.lock().expect("lock").push(row.clone());
            Ok(row)
        }

        async fn expire_outstanding(
            &self,
            subject: Uuid,
            now: DateTime<FixedOffset>,
        ) -> DaoResult<u64> {
            let mut expired = 0;
            for row in self.rows.lock().expect("lock").iter_mut() {
                if row.subject == subject && Self::outstanding(row, now) {
                    row.expires_at = now;
                    expired += 1;
                }
            }
            Ok(expired)
        }

        async fn find_by_prefix(
            &self,
            prefix: &str,
            now: DateTime<FixedOffset>,
        ) -> DaoResult<Vec<FakeToken>> {
            Ok(self
                .rows()
                .into_iter()
                .filter(|row| row.token_prefix.as_deref() == Some(prefix))
                .filter(|row| Self::outstanding(row, now))
                .collect())
        }

        async fn find_without_prefix(&self, now: DateTime<FixedOffset>) -> DaoResult<Vec<FakeToken>> {
            Ok(self
                .rows()
                .into_iter()
                .filter(|row| row.token_prefix.is_none())
                .filter(|row| Self::outstanding(row, now))
                .collect())
        }

        async fn mark_used(&self, id: Uuid, now: DateTime<FixedOffset>) -> DaoResult<bool> {
            let mut rows = self.rows.lock().expect("lock");
            match rows.iter_mut().find(|row| row.id == id && row.used_at.is_none()) {
                Some(row) => {
                    row.used_at = Some(now);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
