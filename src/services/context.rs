use std::path::PathBuf;

use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::JwtKeys,
    db::dao::{DaoContext, RegistrationTokenDao},
    services::{
        admin_service::AdminService,
        auth_service::AuthService,
        feedback_service::FeedbackService,
        muscle_group_service::MuscleGroupService,
        notifier::Notifier,
        token_service::{PASSWORD_RESET_TOKEN_TTL_HOURS, REGISTRATION_TOKEN_TTL_HOURS, TokenService},
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    jwt: JwtKeys,
    notifier: Notifier,
    feedback_dir: PathBuf,
}

impl ServiceContext {
    pub fn new(
        db: &DatabaseConnection,
        jwt: JwtKeys,
        notifier: Notifier,
        feedback_dir: PathBuf,
    ) -> Self {
        Self {
            daos: DaoContext::new(db),
            jwt,
            notifier,
            feedback_dir,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            &state.db,
            state.jwt.clone(),
            state.notifier.clone(),
            state.config.feedback_dir(),
        )
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.daos.user(),
            self.daos.access_request(),
            self.registration_tokens(),
            TokenService::new(
                self.daos.password_reset_token(),
                Duration::hours(PASSWORD_RESET_TOKEN_TTL_HOURS),
            ),
            self.jwt.clone(),
            self.notifier.clone(),
        )
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(
            self.daos.user(),
            self.daos.access_request(),
            self.registration_tokens(),
            self.notifier.clone(),
        )
    }

    pub fn muscle_groups(&self) -> MuscleGroupService {
        MuscleGroupService::new(self.daos.muscle_group())
    }

    pub fn feedback(&self) -> FeedbackService {
        FeedbackService::new(
            self.daos.feedback(),
            self.notifier.clone(),
            self.feedback_dir.clone(),
        )
    }

    fn registration_tokens(&self) -> TokenService<RegistrationTokenDao> {
        TokenService::new(
            self.daos.registration_token(),
            Duration::hours(REGISTRATION_TOKEN_TTL_HOURS),
        )
    }
}
