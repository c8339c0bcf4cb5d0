use chrono::Utc;
use lettre::Address;
use sea_orm::TransactionTrait;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        SessionTokens, TokenKind,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    db::{
        dao::{
            AccessRequestDao, DaoBase, DaoLayerError, NewUser, PasswordResetTokenDao,
            RegistrationTokenDao, UserDao,
        },
        entities::{access_request::AccessRequestStatus, user},
    },
    error::AppError,
    services::{notifier::Notifier, token_service::TokenService},
};

#[derive(Debug, Clone)]
pub struct AccessRequestInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessRequestOutcome {
    pub access_request_id: Uuid,
    pub detail: &'static str,
}

impl AccessRequestOutcome {
    pub const CREATED: &'static str = "Access request created. Please wait for admin approval.";
    pub const RESENT: &'static str = "Access request already approved. Approval email resent.";
}

#[derive(Clone)]
pub struct AuthService {
    users: UserDao,
    access_requests: AccessRequestDao,
    registration_tokens: TokenService<RegistrationTokenDao>,
    reset_tokens: TokenService<PasswordResetTokenDao>,
    jwt: JwtKeys,
    notifier: Notifier,
}

impl AuthService {
    pub fn new(
        users: UserDao,
        access_requests: AccessRequestDao,
        registration_tokens: TokenService<RegistrationTokenDao>,
        reset_tokens: TokenService<PasswordResetTokenDao>,
        jwt: JwtKeys,
        notifier: Notifier,
    ) -> Self {
        Self {
            users,
            access_requests,
            registration_tokens,
            reset_tokens,
            jwt,
            notifier,
        }
    }

    pub async fn request_access(
        &self,
        input: AccessRequestInput,
    ) -> Result<AccessRequestOutcome, AppError> {
        let email = normalize_email(&input.email)?;
        let first_name = required("first_name", &input.first_name)?;
        let last_name = required("last_name", &input.last_name)?;
        info!(%email, "access requested");

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::email_already_registered());
        }

        if let Some(existing) = self.access_requests.latest_for_email(&email).await? {
            match existing.status {
                AccessRequestStatus::Pending => return Err(AppError::access_request_pending()),
                AccessRequestStatus::Rejected => return Err(AppError::access_request_rejected()),
                AccessRequestStatus::Approved => {
                    let token = self.registration_tokens.issue(existing.id).await?;
                    self.notifier.access_approved(&existing, &token);
                    return Ok(AccessRequestOutcome {
                        access_request_id: existing.id,
                        detail: AccessRequestOutcome::RESENT,
                    });
                }
            }
        }

        let request = self
            .access_requests
            .create_pending(&email, first_name, last_name)
            .await?;
        let admins = self.users.list_admins().await?;
        self.notifier.access_requested(&admins, &request);

        Ok(AccessRequestOutcome {
            access_request_id: request.id,
            detail: AccessRequestOutcome::CREATED,
        })
    }

    /// Conflicts are checked before the token is consumed so a taken
    /// username does not burn the invitation.
    pub async fn register(
        &self,
        token: &str,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AppError> {
        let username = required("username", username)?;

        let record = self.registration_tokens.verify(token).await?;
        let request = self
            .access_requests
            .try_find_by_id(record.access_request_id)
            .await?
            .filter(|request| request.status == AccessRequestStatus::Approved)
            .ok_or_else(AppError::invalid_token)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::username_already_registered());
        }
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::email_already_registered());
        }
        let password_hash = hash_password(password)?;

        // Consume and insert commit together; a failed insert leaves the token usable.
        let txn = self.users.db().begin().await.map_err(DaoLayerError::Db)?;
        let consumed =
            RegistrationTokenDao::mark_used_with(&txn, record.id, Utc::now().fixed_offset()).await?;
        if !consumed {
            return Err(AppError::invalid_token());
        }
        let user = UserDao::create_user_with(
            &txn,
            NewUser {
                username: username.to_string(),
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
                is_admin: false,
            },
        )
        .await?;
        txn.commit().await.map_err(DaoLayerError::Db)?;
        info!(username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<SessionTokens, AppError> {
        info!(%username, "login attempt");
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(AppError::invalid_credentials());
        }
        self.jwt.issue_session(&user.username)
    }

    /// New access token for a valid refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let user = self.user_for_token(refresh_token, TokenKind::Refresh).await?;
        self.jwt.issue(&user.username, TokenKind::Access)
    }

    pub async fn authenticate(&self, access_token: &str) -> Result<user::Model, AppError> {
        self.user_for_token(access_token, TokenKind::Access).await
    }

    /// Succeeds whether or not the address is registered.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Ok(email) = normalize_email(email) else {
            return Ok(());
        };
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(());
        };
        match self.reset_tokens.issue(user.id).await {
            Ok(token) => self.notifier.password_reset(&user, &token),
            Err(err) => warn!(user_id = %user.id, "failed to issue password reset token: {err}"),
        }
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AppError> {
        let record = self.reset_tokens.verify(token).await?;
        let password_hash = hash_password(password)?;
        self.reset_tokens.consume(&record).await?;
        self.users
            .set_password_hash(record.user_id, password_hash)
            .await?;
        info!(user_id = %record.user_id, "password reset");
        Ok(())
    }

    async fn user_for_token(&self, token: &str, kind: TokenKind) -> Result<user::Model, AppError> {
        let claims = self.jwt.verify(token, kind)?;
        self.users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(AppError::invalid_credentials)
    }
}

/// Trims and lowercases the domain; the local part keeps its case.
fn normalize_email(email: &str) -> Result<String, AppError> {
    let address = email
        .trim()
        .parse::<Address>()
        .map_err(|_| AppError::validation("A valid email address is required"))?;
    Ok(format!(
        "{}@{}",
        address.user(),
        address.domain().to_ascii_lowercase()
    ))
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(value)
}
