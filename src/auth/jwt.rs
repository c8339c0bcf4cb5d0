use std::{
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{Claims, SessionTokens, TokenKind};
use crate::{config::AuthConfig, error::AppError};

const SECS_PER_MINUTE: usize = 60;
const SECS_PER_DAY: usize = 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
    algorithm: Algorithm,
    access_ttl_secs: usize,
    refresh_ttl_secs: usize,
}

impl JwtKeys {
    /// HS256 keys with the default session lifetimes.
    pub fn from_secret(secret: &[u8]) -> Self {
        let defaults = AuthConfig::default();
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl_secs: defaults.access_token_expire_minutes as usize * SECS_PER_MINUTE,
            refresh_ttl_secs: defaults.refresh_token_expire_days as usize * SECS_PER_DAY,
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> anyhow::Result<Self> {
        let algorithm = Algorithm::from_str(&cfg.jwt_algorithm)
            .map_err(|err| anyhow::anyhow!("unsupported jwt algorithm '{}': {err}", cfg.jwt_algorithm))?;

        Ok(Self {
            algorithm,
            access_ttl_secs: cfg.access_token_expire_minutes.max(1) as usize * SECS_PER_MINUTE,
            refresh_ttl_secs: cfg.refresh_token_expire_days.max(1) as usize * SECS_PER_DAY,
            ..Self::from_secret(cfg.jwt_secret.as_bytes())
        })
    }

    pub fn access_ttl_secs(&self) -> usize {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> usize {
        self.refresh_ttl_secs
    }

    pub fn issue(&self, username: &str, kind: TokenKind) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        encode_token(self, &make_claims(username, kind, ttl))
    }

    pub fn issue_session(&self, username: &str) -> Result<SessionTokens, AppError> {
        Ok(SessionTokens {
            access_token: self.issue(username, TokenKind::Access)?,
            refresh_token: self.issue(username, TokenKind::Refresh)?,
        })
    }

    /// Decodes and checks signature, expiry and token kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.dec, &validation)?.claims;
        if claims.kind != expected || claims.sub.is_empty() {
            return Err(AppError::invalid_credentials());
        }
        Ok(claims)
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(keys.algorithm);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

pub fn make_claims(username: &str, kind: TokenKind, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    Claims {
        sub: username.to_string(),
        iat,
        exp: iat + ttl_secs,
        kind,
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("jwt rejected: {err}");
        AppError::invalid_credentials()
    }
}
