use sea_orm::DatabaseConnection;

use super::{
    AccessRequestDao, DaoBase, FeedbackDao, MuscleGroupDao, PasswordResetTokenDao,
    RegistrationTokenDao, UserDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn access_request(&self) -> AccessRequestDao {
        DaoBase::new(&self.db)
    }

    pub fn registration_token(&self) -> RegistrationTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn password_reset_token(&self) -> PasswordResetTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn feedback(&self) -> FeedbackDao {
        DaoBase::new(&self.db)
    }

    pub fn muscle_group(&self) -> MuscleGroupDao {
        DaoBase::new(&self.db)
    }
}
