//! Base de test: SQLite en mémoire, une par test (pas de nettoyage nécessaire)

use std::path::Path;

use catalogue_backend::config::AppConfig;
use catalogue_backend::db;
use catalogue_backend::migration::Migrator;
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

pub const TEST_DATABASE_URL: &str = "sqlite::memory:";
pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Base vide: aucune migration appliquée
pub async fn empty_test_database() -> Result<DatabaseConnection, DbErr> {
    db::connect(TEST_DATABASE_URL, 1).await
}

/// Base avec toutes les migrations appliquées
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let db = empty_test_database().await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        database_url: TEST_DATABASE_URL.to_string(),
        database_max_connections: 1,
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_ttl_hours: 1,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024,
        run_migrations: false,
    }
}
