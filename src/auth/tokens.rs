//! Single-use secrets handed out by email (registration, password reset).
//!
//! Only an argon2 digest and the first [`TOKEN_PREFIX_LEN`] characters are
//! persisted. The prefix narrows the candidate rows; the digest decides.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, FixedOffset};
use rand::{RngCore, rngs::OsRng};

use super::password::{hash_secret, verify_password};
use crate::error::AppError;

pub const TOKEN_BYTES: usize = 32;
pub const TOKEN_PREFIX_LEN: usize = 12;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Plaintext, only ever sent to the recipient.
    pub token: String,
    pub prefix: String,
    pub hash: String,
}

pub fn generate() -> Result<IssuedToken, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);

    let prefix = prefix_of(&token)
        .ok_or_else(|| AppError::internal("generated token shorter than prefix"))?
        .to_string();
    let hash = hash_secret(&token)?;

    Ok(IssuedToken {
        token,
        prefix,
        hash,
    })
}

pub fn prefix_of(token: &str) -> Option<&str> {
    token.get(..TOKEN_PREFIX_LEN)
}

pub fn matches(token: &str, hash: &str) -> bool {
    verify_password(token, hash)
}

pub fn is_expired(expires_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> bool {
    now >= expires_at
}
