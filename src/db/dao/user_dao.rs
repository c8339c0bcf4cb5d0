use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find_first(move |query| query.filter(user::Column::Username.eq(username)))
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_first(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> DaoResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        User::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn list_admins(&self) -> DaoResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::IsAdmin.eq(true))
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Every user, newest first.
    pub async fn list_all(&self) -> DaoResult<Vec<user::Model>> {
        self.find_iter(None, None, |query| query).collect_all().await
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        Self::create_user_with(&self.db, new_user).await
    }

    /// Insert on any connection; used inside the registration transaction.
    pub async fn create_user_with<C: ConnectionTrait>(
        conn: &C,
        new_user: NewUser,
    ) -> DaoResult<user::Model> {
        let now = Utc::now().fixed_offset();
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password_hash: Set(new_user.password_hash),
            is_admin: Set(new_user.is_admin),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(DaoLayerError::Db)
    }

    pub async fn set_password_hash(&self, id: Uuid, password_hash: String) -> DaoResult<()> {
        self.update(id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
        .map(|_| ())
    }
}
