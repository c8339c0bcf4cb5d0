use std::{marker::PhantomData, sync::Arc};

use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::{RequiredRole, Role, cookies::ACCESS_COOKIE},
    db::entities::user,
    error::AppError,
    services::ServiceContext,
    state::AppState,
};

/// The account behind the `access_token` cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

// Auth guard: validate the access cookie and load its user.
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(current);
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(AppError::invalid_credentials)?;

        let user = ServiceContext::from_state(state.as_ref())
            .auth()
            .authenticate(&token)
            .await?;

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

pub type AuthGuard = CurrentUser;

pub struct AuthRoleGuard<R: RequiredRole> {
    pub user: user::Model,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !Role::for_account(user.is_admin).contains(&R::required()) {
            return Err(AppError::forbidden("Missing required role"));
        }

        Ok(Self {
            user,
            _marker: PhantomData,
        })
    }
}
