pub mod admin;
pub mod auth;
pub mod feedback;
pub mod health;
pub mod muscle_groups;
mod router;
pub mod users;

pub use router::router;
