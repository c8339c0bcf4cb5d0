use anyhow::{Result, bail};

use super::{AppConfig, EmailConfig, GitHubConfig, defaults};

const MIN_ADMIN_PASSWORD_LEN: usize = 8;
const SUPPORTED_JWT_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.general.client_url.trim().is_empty() {
        errors.push("general.client_url must not be empty".to_string());
    }

    if cfg.database.connection_url().trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.auth.jwt_secret.trim().is_empty() {
        errors.push("auth.jwt_secret must not be empty".to_string());
    }

    if !SUPPORTED_JWT_ALGORITHMS.contains(&cfg.auth.jwt_algorithm.as_str()) {
        errors.push(format!(
            "auth.jwt_algorithm must be one of {}",
            SUPPORTED_JWT_ALGORITHMS.join(", ")
        ));
    }

    if cfg.auth.access_token_expire_minutes <= 0 {
        errors.push("auth.access_token_expire_minutes must be > 0".to_string());
    }

    if cfg.auth.refresh_token_expire_days <= 0 {
        errors.push("auth.refresh_token_expire_days must be > 0".to_string());
    }

    if let Some(admin) = cfg.admin.as_ref() {
        if admin.username.trim().is_empty() {
            errors.push("admin.username must not be empty".to_string());
        }

        if !admin.email.contains('@') {
            errors.push("admin.email must be an email address".to_string());
        }

        if admin.password.len() < MIN_ADMIN_PASSWORD_LEN {
            errors.push(format!(
                "admin.password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
            ));
        }
    }

    if let EmailConfig::Smtp(smtp) = &cfg.email {
        if smtp.smtp_host.trim().is_empty() {
            errors.push("email.smtp_host must not be empty".to_string());
        }

        if !smtp.email_from.contains('@') {
            errors.push("email.email_from must be an email address".to_string());
        }

        if smtp.smtp_use_tls && smtp.smtp_use_ssl {
            errors.push("email.smtp_use_tls and email.smtp_use_ssl are mutually exclusive".to_string());
        }
    }

    if let GitHubConfig::Api(api) = &cfg.github {
        if api.token.trim().is_empty() {
            errors.push("github.token must not be empty".to_string());
        }

        if api.repo_owner.trim().is_empty() || api.repo_name.trim().is_empty() {
            errors.push("github.repo_owner and github.repo_name must not be empty".to_string());
        }
    }

    if cfg.is_prod_like() {
        if !matches!(cfg.email, EmailConfig::Smtp(_)) {
            errors.push("email.backend must be 'smtp' in production".to_string());
        }

        if !matches!(cfg.github, GitHubConfig::Api(_)) {
            errors.push("github.backend must be 'api' in production".to_string());
        }

        if cfg.auth.jwt_secret == defaults::DEFAULT_JWT_SECRET {
            errors.push("auth.jwt_secret must be set in production".to_string());
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
