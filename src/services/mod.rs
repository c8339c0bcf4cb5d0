pub mod admin_service;
pub mod auth_service;
pub mod context;
pub mod feedback_service;
pub mod muscle_group_service;
pub mod notifier;
pub mod token_service;

#[cfg(test)]
mod test_support;

pub use context::ServiceContext;
