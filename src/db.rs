// connexion BD
//
// La connexion est construite explicitement au démarrage à partir de
// AppConfig, injectée dans actix via web::Data, puis fermée à l'arrêt.
// Pas de singleton global.

use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

use crate::config::AppConfig;
use crate::migration::Migrator;

pub async fn establish_connection(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    connect(&config.database_url, config.database_max_connections).await
}

pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());

    // SQLite (dev / tests): une seule connexion, sinon une BD :memory: par
    // connexion et les PRAGMA des migrations ne s'appliquent pas partout
    let max_connections = if database_url.starts_with("sqlite:") {
        1
    } else {
        max_connections.max(1)
    };

    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await
}

/// Applique toutes les migrations en attente, dans l'ordre des préfixes.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?;
    if pending.is_empty() {
        log::info!("Database schema is up to date");
        return Ok(());
    }

    for migration in &pending {
        log::info!("Pending migration: {}", migration.name());
    }

    Migrator::up(db, None).await?;
    log::info!("Applied {} migration(s)", pending.len());
    Ok(())
}

pub async fn close(db: DatabaseConnection) -> Result<(), DbErr> {
    log::info!("Closing database connection pool");
    db.close().await
}
