use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::AccessRequestRequest;
use crate::services::access_request_service::AccessRequestService;

/// POST /datasets/{id}/access-requests - enregistré dans le scope /datasets
#[post("/{id}/access-requests")]
pub async fn create_access_request(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<AccessRequestRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let request =
        AccessRequestService::create(db.get_ref(), path.into_inner(), auth_user.user_id, body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(request))
}

/// GET /access-requests/mine
#[get("/mine")]
pub async fn my_access_requests(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let requests = AccessRequestService::list_for_user(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(requests))
}

pub fn access_requests_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/access-requests").service(my_access_requests));
}
