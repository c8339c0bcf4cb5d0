pub mod access_request_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod feedback_dao;
pub mod muscle_group_dao;
pub mod password_reset_token_dao;
pub mod registration_token_dao;
pub mod token_store;
pub mod user_dao;

pub use access_request_dao::AccessRequestDao;
pub use base::{DaoBase, DaoPager, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use feedback_dao::{FeedbackDao, NewFeedback};
pub use muscle_group_dao::MuscleGroupDao;
pub use password_reset_token_dao::PasswordResetTokenDao;
pub use registration_token_dao::RegistrationTokenDao;
pub use token_store::{TokenRecord, TokenStore};
pub use user_dao::{NewUser, UserDao};
