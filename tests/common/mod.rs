#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use floormatch_backend::config::AppConfig;
use floormatch_backend::create_pool;
use floormatch_backend::db::{contractors as contractor_db, users as user_db};
use floormatch_backend::models::contractor_profiles;
use floormatch_backend::models::users::{self, ExternalId, Roles, UserFields};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};

/// Fresh in-memory SQLite database with the full schema applied.
///
/// One pooled connection, since every in-memory connection is its own database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// A throwaway SQLite file behind a regular multi-connection pool, so
/// transactions on different connections really overlap.
pub struct FileDb {
    pub db: DatabaseConnection,
    path: PathBuf,
}

impl Drop for FileDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub async fn setup_file_db() -> FileDb {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "floormatch-test-{}-{}.db",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);

    // Same path the server takes: DATABASE_URL straight into the pool.
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let config = AppConfig::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone()));
    let db = create_pool(config.database_url.as_deref().unwrap())
        .await
        .unwrap();
    Migrator::up(&db, None).await.unwrap();
    FileDb { db, path }
}

pub fn ext(id: i64) -> ExternalId {
    ExternalId::new(id).unwrap()
}

pub async fn create_user(
    db: &DatabaseConnection,
    external_id: i64,
    role: Roles,
    name: &str,
) -> users::Model {
    user_db::insert_user(
        db,
        ext(external_id),
        role,
        UserFields {
            name: Some(name.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub async fn create_client(db: &DatabaseConnection, external_id: i64) -> users::Model {
    create_user(db, external_id, Roles::Client, &format!("client-{external_id}")).await
}

/// A contractor with an active profile listing `categories`.
pub async fn create_contractor(
    db: &DatabaseConnection,
    external_id: i64,
    categories: &[&str],
) -> users::Model {
    let user = create_user(
        db,
        external_id,
        Roles::Contractor,
        &format!("contractor-{external_id}"),
    )
    .await;
    let set: BTreeSet<String> = categories.iter().map(|c| c.to_string()).collect();
    contractor_db::upsert_profile(db, user.id, Some(3), set, true)
        .await
        .unwrap();
    user
}

/// Overwrite the engine-owned quality signals directly.
pub async fn set_track_record(db: &DatabaseConnection, user_id: i64, rating: f64, completed: i32) {
    let profile = contractor_profiles::Entity::find_by_id(user_id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: contractor_profiles::ActiveModel = profile.into();
    active.rating = Set(rating);
    active.completed_orders = Set(completed);
    active.update(db).await.unwrap();
}

pub async fn profile_row(db: &DatabaseConnection, user_id: i64) -> contractor_profiles::Model {
    contractor_profiles::Entity::find_by_id(user_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
}
