pub mod cookies;
pub mod jwt;
pub mod password;
pub mod tokens;
mod types;

pub use types::{AdminRole, Claims, RequiredRole, Role, SessionTokens, TokenKind, UserRole};
