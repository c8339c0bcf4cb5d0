//! Idempotent startup data. Steps run in order and skip rows that exist.

use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    auth::password::hash_password,
    config::AdminConfig,
    db::dao::{DaoContext, NewUser},
};

pub const MUSCLE_GROUPS: [(&str, &str); 6] = [
    (
        "chest",
        "Muscles of the anterior upper torso primarily responsible for pushing movements of the arms.",
    ),
    (
        "back",
        "Muscles of the posterior torso responsible for pulling movements, spinal support, and posture.",
    ),
    (
        "arms",
        "Muscles of the upper limbs responsible for elbow flexion and extension and assisting pushing and pulling movements.",
    ),
    (
        "shoulders",
        "Muscles surrounding the shoulder joint responsible for arm abduction, rotation, and stabilization.",
    ),
    (
        "core",
        "Muscles of the trunk responsible for spinal stability, posture, and force transfer between upper and lower body.",
    ),
    (
        "legs",
        "Muscles of the hips, thighs, and lower legs responsible for locomotion, squatting, and lower-body force production.",
    ),
];

pub async fn run(db: &DatabaseConnection, admin: Option<&AdminConfig>) -> anyhow::Result<()> {
    let daos = DaoContext::new(db);
    seed_muscle_groups(&daos).await?;
    if let Some(admin) = admin {
        seed_admin(&daos, admin).await?;
    }
    Ok(())
}

/// Returns how many groups were inserted.
pub async fn seed_muscle_groups(daos: &DaoContext) -> anyhow::Result<usize> {
    let dao = daos.muscle_group();
    let mut inserted = 0;
    for (name, description) in MUSCLE_GROUPS {
        if dao
            .find_by_name(name)
            .await
            .with_context(|| format!("looking up muscle group '{name}'"))?
            .is_some()
        {
            continue;
        }
        dao.create_group(name, description)
            .await
            .with_context(|| format!("seeding muscle group '{name}'"))?;
        inserted += 1;
    }
    if inserted > 0 {
        info!(inserted, "seeded muscle groups");
    }
    Ok(inserted)
}

/// Returns `true` when the admin account was created.
pub async fn seed_admin(daos: &DaoContext, cfg: &AdminConfig) -> anyhow::Result<bool> {
    let users = daos.user();
    if let Some(existing) = users
        .find_by_username(&cfg.username)
        .await
        .context("looking up admin user")?
    {
        info!(username = %existing.username, "admin user already present");
        return Ok(false);
    }

    let password_hash =
        hash_password(&cfg.password).map_err(|err| anyhow::anyhow!("admin seed hash error: {err}"))?;
    let admin = users
        .create_user(NewUser {
            username: cfg.username.clone(),
            email: cfg.email.clone(),
            first_name: cfg.first_name.clone(),
            last_name: cfg.last_name.clone(),
            password_hash,
            is_admin: true,
        })
        .await
        .context("creating admin user")?;
    info!(username = %admin.username, "seeded admin user");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::{
        config::AdminConfig,
        db::{
            dao::DaoContext,
            entities::{muscle_group, user},
        },
    };

    use super::{MUSCLE_GROUPS, seed_admin, seed_muscle_groups};

    fn group(name: &str, description: &str) -> muscle_group::Model {
        muscle_group::Model {
            id: Uuid::new_v4(),
            created_at: Utc::now().fixed_offset(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    fn admin_config() -> AdminConfig {
        AdminConfig {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            password: "admin-password".to_string(),
        }
    }

    fn admin_model(cfg: &AdminConfig) -> user::Model {
        let now = Utc::now().fixed_offset();
        user::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            username: cfg.username.clone(),
            email: cfg.email.clone(),
            first_name: cfg.first_name.clone(),
            last_name: cfg.last_name.clone(),
            password_hash: "hash".to_string(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn muscle_groups_are_skipped_when_present() {
        let lookups = MUSCLE_GROUPS
            .iter()
            .map(|(name, description)| vec![group(name, description)]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(lookups)
            .into_connection();

        let inserted = seed_muscle_groups(&DaoContext::new(&db))
            .await
            .expect("seeding should succeed");
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn missing_muscle_group_is_inserted() {
        let mut results: Vec<Vec<muscle_group::Model>> = MUSCLE_GROUPS[..5]
            .iter()
            .map(|(name, description)| vec![group(name, description)])
            .collect();
        let (legs, legs_description) = MUSCLE_GROUPS[5];
        results.push(Vec::new());
        results.push(vec![group(legs, legs_description)]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection();

        let inserted = seed_muscle_groups(&DaoContext::new(&db))
            .await
            .expect("seeding should succeed");
        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn admin_seed_noops_when_username_exists() {
        let cfg = admin_config();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin_model(&cfg)]])
            .into_connection();

        let created = seed_admin(&DaoContext::new(&db), &cfg)
            .await
            .expect("seeding should succeed");
        assert!(!created);
    }

    #[tokio::test]
    async fn admin_seed_creates_admin_account() {
        let cfg = admin_config();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::new(), vec![admin_model(&cfg)]])
            .into_connection();

        let created = seed_admin(&DaoContext::new(&db), &cfg)
            .await
            .expect("seeding should succeed");
        assert!(created);
    }
}
