// ============================================================================
// CATALOGUE BACKEND - BIBLIOTHÈQUE
// ============================================================================
//
// Description:
//   API REST du catalogue de datasets et de showcases.
//   Le binaire (main.rs) ne fait que lire la config, ouvrir la BD,
//   appliquer les migrations et lancer le serveur actix.
//
// Modules:
//   - config : configuration typée lue depuis l'environnement (.env)
//   - db : connexion à la BD et cycle de vie (init / migrations / close)
//   - error : AppError, converti en réponse JSON {"error": ...}
//   - migration : ledger des migrations sea-orm (ordre = préfixe horodaté)
//   - models : entités SeaORM + types du domaine (modération, lifecycle)
//   - services : logique métier (datasets, tags, showcases, settings, ...)
//   - routes : endpoints actix-web
//   - middleware : extracteurs AuthUser / AdminUser (JWT)
//   - utils : jwt, hash des mots de passe, fichiers uploadés
//
// ============================================================================

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::utils::jwt::JwtConfig;
use crate::utils::uploads::UploadStore;

/// Enregistre les données partagées (BD, JWT, uploads) et les routes.
/// Utilisé par main.rs et par les tests d'intégration.
pub fn configure_app(cfg: &mut web::ServiceConfig, db: &DatabaseConnection, config: &AppConfig) {
    cfg.app_data(web::Data::new(db.clone()))
        .app_data(web::Data::new(JwtConfig::from_config(config)))
        .app_data(web::Data::new(UploadStore::from_config(config)))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid path: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid query: {}", err)).into()
        }))
        .configure(routes::configure_routes)
        .service(actix_files::Files::new("/uploads", config.upload_dir.clone()));
}
