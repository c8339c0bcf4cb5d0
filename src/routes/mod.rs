pub mod api;
mod entry;

pub use crate::{
    auth::{AdminRole, RequiredRole, UserRole},
    middleware::{AuthGuard, AuthRoleGuard, CurrentUser},
    response::{ApiResult, JsonApiResponse},
};
pub use entry::{API_PREFIX, app, router};
