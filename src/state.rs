use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::{cookies::CookiePolicy, jwt::JwtKeys},
    config::AppConfig,
    notify::{self, messages::Messages},
    services::notifier::Notifier,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    pub notifier: Notifier,
}

impl AppState {
    /// Builds JWT keys and notification backends from config.
    pub fn new(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<Arc<Self>> {
        let jwt = JwtKeys::from_config(&config.auth)?;
        let notifier = Notifier::new(
            notify::email_sender(&config.email)?,
            notify::issue_tracker(&config.github)?,
            Messages::new(&config.general.client_url, config.general.env.project_name()),
        );
        tracing::info!(
            email = config.email.backend_name(),
            github = config.github.backend_name(),
            "notification backends ready"
        );
        Ok(Self::from_parts(config, db, jwt, notifier))
    }

    pub fn from_parts(
        config: AppConfig,
        db: DatabaseConnection,
        jwt: JwtKeys,
        notifier: Notifier,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            jwt,
            notifier,
        })
    }

    pub fn cookies(&self) -> CookiePolicy {
        CookiePolicy::from_config(&self.config)
    }
}
