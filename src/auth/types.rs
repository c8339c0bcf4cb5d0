use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Admins hold both roles so user-level guards accept them too.
    pub fn for_account(is_admin: bool) -> Vec<Role> {
        if is_admin {
            vec![Role::Admin, Role::User]
        } else {
            vec![Role::User]
        }
    }
}

pub trait RequiredRole {
    fn required() -> Role;
}

pub struct UserRole;

impl RequiredRole for UserRole {
    fn required() -> Role {
        Role::User
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn required() -> Role {
        Role::Admin
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // username
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
    pub kind: TokenKind,
}

#[derive(Debug)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::{AdminRole, RequiredRole, Role, UserRole};

    #[test]
    fn admin_accounts_hold_both_roles() {
        assert_eq!(Role::for_account(true), vec![Role::Admin, Role::User]);
        assert_eq!(Role::for_account(false), vec![Role::User]);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn required_role_markers_map_to_expected_role() {
        assert_eq!(UserRole::required(), Role::User);
        assert_eq!(AdminRole::required(), Role::Admin);
    }
}
