pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AdminConfig, AppConfig, AuthConfig, DatabaseConfig, EmailConfig, Environment, GeneralConfig,
    GitHubApiConfig, GitHubConfig, LoggingConfig, SmtpConfig,
};
pub use envconfig::EnvConfig;
