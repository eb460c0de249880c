use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::ShowcaseRequest;
use crate::services::showcase_service::ShowcaseService;

#[get("")]
pub async fn list_showcases(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let showcases = ShowcaseService::list_public(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(showcases))
}

#[get("/{id}")]
pub async fn get_showcase(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    auth_user: Option<AuthUser>,
) -> Result<HttpResponse, AppError> {
    let showcase = ShowcaseService::get_visible(db.get_ref(), path.into_inner(), auth_user.as_ref()).await?;
    Ok(HttpResponse::Ok().json(showcase))
}

#[post("")]
pub async fn create_showcase(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    body: web::Json<ShowcaseRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let showcase = ShowcaseService::create(db.get_ref(), auth_user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(showcase))
}

#[put("/{id}")]
pub async fn update_showcase(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<ShowcaseRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let showcase =
        ShowcaseService::update(db.get_ref(), path.into_inner(), &auth_user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(showcase))
}

#[delete("/{id}")]
pub async fn delete_showcase(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    ShowcaseService::soft_delete(db.get_ref(), path.into_inner(), &auth_user).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn showcases_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/showcases")
            .service(list_showcases)
            .service(get_showcase)
            .service(create_showcase)
            .service(update_showcase)
            .service(delete_showcase)
    );
}
