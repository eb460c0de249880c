use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::services::setting_service::SettingService;

/// GET /settings - Réglages publics, valeurs typées
#[get("")]
pub async fn list_settings(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let settings = SettingService::list(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[get("/{key}")]
pub async fn get_setting(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let setting = SettingService::get(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(setting))
}

pub fn settings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .service(list_settings)
            .service(get_setting)
    );
}
