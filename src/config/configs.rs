use std::path::PathBuf;

use anyhow::Result;
use axum_extra::extract::cookie::SameSite;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: Option<AdminConfig>,
    pub email: EmailConfig,
    pub github: GitHubConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    pub fn is_prod_like(&self) -> bool {
        self.general.env.is_prod_like()
    }

    /// Origins allowed to call the API with credentials.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![self.general.client_url.clone()];
        if !self.is_prod_like() {
            origins.push(defaults::LOCALHOST_ORIGIN.to_string());
        }
        origins
    }

    pub fn cookie_secure(&self) -> bool {
        self.general.env != Environment::Test
    }

    pub fn cookie_same_site(&self) -> SameSite {
        if self.is_prod_like() {
            SameSite::Lax
        } else {
            SameSite::None
        }
    }

    pub fn feedback_dir(&self) -> PathBuf {
        self.general.data_dir.join("feedback")
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Test,
    Stage,
    Prod,
}

impl Environment {
    pub fn is_prod_like(self) -> bool {
        matches!(self, Environment::Stage | Environment::Prod)
    }

    pub fn project_name(self) -> &'static str {
        match self {
            Environment::Dev => "RepTrack-Dev",
            Environment::Test => "RepTrack-Test",
            Environment::Stage => "RepTrack-Stage",
            Environment::Prod => "RepTrack",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    pub env: Environment,
    pub client_url: String,
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
            env: Environment::default(),
            client_url: defaults::DEFAULT_CLIENT_URL.to_string(),
            data_dir: PathBuf::from(defaults::DEFAULT_DATA_DIR),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Full DSN; takes precedence over the individual connection fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: defaults::DEFAULT_DB_HOST.to_string(),
            port: defaults::DEFAULT_DB_PORT as u16,
            name: defaults::DEFAULT_DB_NAME.to_string(),
            user: defaults::DEFAULT_DB_USER.to_string(),
            password: defaults::DEFAULT_DB_PASSWORD.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS as u32,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE as u32,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: defaults::DEFAULT_JWT_SECRET.to_string(),
            jwt_algorithm: defaults::DEFAULT_JWT_ALGORITHM.to_string(),
            access_token_expire_minutes: defaults::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            refresh_token_expire_days: defaults::DEFAULT_REFRESH_TOKEN_EXPIRE_DAYS,
        }
    }
}

/// Bootstrap administrator, created at startup when missing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum EmailConfig {
    Smtp(SmtpConfig),
    #[default]
    Console,
    Disabled,
}

impl EmailConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            EmailConfig::Smtp(_) => "smtp",
            EmailConfig::Console => "console",
            EmailConfig::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SmtpConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default)]
    pub smtp_use_tls: bool,
    #[serde(default)]
    pub smtp_use_ssl: bool,
    pub email_from: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum GitHubConfig {
    Api(GitHubApiConfig),
    #[default]
    Console,
}

impl GitHubConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            GitHubConfig::Api(_) => "api",
            GitHubConfig::Console => "console",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GitHubApiConfig {
    pub token: String,
    pub repo_owner: String,
    pub repo_name: String,
}

fn default_smtp_port() -> u16 {
    defaults::DEFAULT_SMTP_PORT as u16
}
