use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::{SessionTokens, jwt::JwtKeys};
use crate::config::AppConfig;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Attributes shared by both session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            secure: cfg.cookie_secure(),
            same_site: cfg.cookie_same_site(),
        }
    }

    pub fn with_session(&self, jar: CookieJar, tokens: SessionTokens, keys: &JwtKeys) -> CookieJar {
        let jar = self.with_access(jar, tokens.access_token, keys);
        jar.add(self.cookie(REFRESH_COOKIE, tokens.refresh_token, keys.refresh_ttl_secs()))
    }

    pub fn with_access(&self, jar: CookieJar, access_token: String, keys: &JwtKeys) -> CookieJar {
        jar.add(self.cookie(ACCESS_COOKIE, access_token, keys.access_ttl_secs()))
    }

    /// Only cookies the client actually sent produce removal headers.
    pub fn cleared(&self, jar: CookieJar) -> CookieJar {
        jar.remove(self.cookie(ACCESS_COOKIE, String::new(), 0))
            .remove(self.cookie(REFRESH_COOKIE, String::new(), 0))
    }

    fn cookie(&self, name: &'static str, value: String, max_age_secs: usize) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .max_age(time::Duration::seconds(max_age_secs as i64))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use axum_extra::extract::cookie::{CookieJar, SameSite};

    use crate::auth::{SessionTokens, jwt::JwtKeys};

    use super::{ACCESS_COOKIE, CookiePolicy, REFRESH_COOKIE};

    fn policy(secure: bool, same_site: SameSite) -> CookiePolicy {
        CookiePolicy { secure, same_site }
    }

    #[test]
    fn session_cookies_are_http_only_with_jwt_lifetimes() {
        let keys = JwtKeys::from_secret(b"cookie-secret");
        let jar = policy(true, SameSite::Lax).with_session(
            CookieJar::new(),
            SessionTokens {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
            },
            &keys,
        );

        let access = jar.get(ACCESS_COOKIE).expect("access cookie should be set");
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(
            access.max_age().map(|age| age.whole_seconds()),
            Some(keys.access_ttl_secs() as i64)
        );

        let refresh = jar.get(REFRESH_COOKIE).expect("refresh cookie should be set");
        assert_eq!(
            refresh.max_age().map(|age| age.whole_seconds()),
            Some(keys.refresh_ttl_secs() as i64)
        );
    }

    #[test]
    fn cleared_jar_drops_cookies_the_client_sent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=a; refresh_token=r"),
        );
        let jar = CookieJar::from_headers(&headers);

        let cleared = policy(false, SameSite::None).cleared(jar);

        assert!(cleared.get(ACCESS_COOKIE).is_none());
        assert!(cleared.get(REFRESH_COOKIE).is_none());
    }
}
