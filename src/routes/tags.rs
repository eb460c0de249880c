use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::CreateTagRequest;
use crate::services::tag_service::TagService;

/// GET /tags - Tags approuvés, dans l'ordre de la barre de navigation
#[get("")]
pub async fn list_tags(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let tags = TagService::list_approved(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// POST /tags - Proposer un tag (en attente de modération)
#[post("")]
pub async fn create_tag(
    db: web::Data<DatabaseConnection>,
    _auth_user: AuthUser,
    body: web::Json<CreateTagRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let tag = TagService::create(db.get_ref(), &body.name).await?;
    Ok(HttpResponse::Created().json(tag))
}

pub fn tags_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tags")
            .service(list_tags)
            .service(create_tag)
    );
}
