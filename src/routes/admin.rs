use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::models::dto::{
    HomepageOrderRequest, ModerationListQuery, ModerationResponse, SettingRequest, UpdateTagRequest,
};
use crate::models::moderation::{ModerationAction, ModerationFilter};
use crate::models::{dataset_tags, datasets, showcases};
use crate::services::access_request_service::AccessRequestService;
use crate::services::dataset_service::DatasetService;
use crate::services::moderation_service::ModerationService;
use crate::services::setting_service::SettingService;
use crate::services::tag_service::TagService;
use crate::services::user_service::UserService;

// ----------------------------------------------------------------------------
// Modération (datasets, tags, showcases)
// ----------------------------------------------------------------------------

/// GET /admin/moderation/{kind}?status=pending|approved|denied|conflicting
/// Sans `status`, liste ce qui attend une décision
#[get("/moderation/{kind}")]
pub async fn list_moderation(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<String>,
    query: web::Query<ModerationListQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.status.unwrap_or(ModerationFilter::Pending);

    let response = match path.as_str() {
        "datasets" => HttpResponse::Ok().json(ModerationService::list::<datasets::Entity>(db.get_ref(), filter).await?),
        "tags" => HttpResponse::Ok().json(ModerationService::list::<dataset_tags::Entity>(db.get_ref(), filter).await?),
        "showcases" => HttpResponse::Ok().json(ModerationService::list::<showcases::Entity>(db.get_ref(), filter).await?),
        _ => return Err(AppError::NotFound("Moderation list")),
    };

    Ok(response)
}

/// POST /admin/{kind}/{id}/{action}
#[post("/{kind:datasets|tags|showcases}/{id}/{action:approve|deny|reset}")]
pub async fn moderate(
    db: web::Data<DatabaseConnection>,
    admin: AdminUser,
    path: web::Path<(String, i32, String)>,
) -> Result<HttpResponse, AppError> {
    let (kind, id, action) = path.into_inner();
    let action: ModerationAction = action.parse().map_err(AppError::BadRequest)?;

    let moderation = match kind.as_str() {
        "datasets" => ModerationService::transition::<datasets::Entity>(db.get_ref(), id, action).await?,
        "tags" => ModerationService::transition::<dataset_tags::Entity>(db.get_ref(), id, action).await?,
        "showcases" => ModerationService::transition::<showcases::Entity>(db.get_ref(), id, action).await?,
        _ => return Err(AppError::NotFound("Moderation target")),
    };

    log::info!("Admin {} applied {:?} to {} {}", admin.0.email, action, kind, id);
    Ok(HttpResponse::Ok().json(ModerationResponse { id, moderation }))
}

// ----------------------------------------------------------------------------
// Datasets et tags
// ----------------------------------------------------------------------------

#[put("/datasets/{id}/homepage-order")]
pub async fn set_homepage_order(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<HomepageOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let dataset =
        DatasetService::set_homepage_order(db.get_ref(), path.into_inner(), body.order_in_homepage).await?;
    Ok(HttpResponse::Ok().json(dataset))
}

#[get("/datasets/{id}/access-requests")]
pub async fn dataset_access_requests(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let requests = AccessRequestService::list_for_dataset(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[put("/tags/{id}")]
pub async fn update_tag(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateTagRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let tag = TagService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tag))
}

// ----------------------------------------------------------------------------
// Utilisateurs
// ----------------------------------------------------------------------------

#[get("/users")]
pub async fn list_users(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let users = UserService::list(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[post("/users/{id}/activate")]
pub async fn activate_user(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::activate(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /admin/users/{id} - Suppression physique: datasets, showcases et
/// demandes d'accès partent en cascade
#[delete("/users/{id}")]
pub async fn delete_user(
    db: web::Data<DatabaseConnection>,
    admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if user_id == admin.0.user_id {
        return Err(AppError::BadRequest("Admins cannot delete their own account".to_string()));
    }

    UserService::purge(db.get_ref(), user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ----------------------------------------------------------------------------
// Réglages
// ----------------------------------------------------------------------------

#[put("/settings/{key}")]
pub async fn put_setting(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<SettingRequest>,
) -> Result<HttpResponse, AppError> {
    let setting = SettingService::upsert(db.get_ref(), &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(setting))
}

#[delete("/settings/{key}")]
pub async fn delete_setting(
    db: web::Data<DatabaseConnection>,
    _admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    SettingService::delete(db.get_ref(), &path).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(list_moderation)
            .service(set_homepage_order)
            .service(dataset_access_requests)
            .service(update_tag)
            .service(list_users)
            .service(activate_user)
            .service(delete_user)
            .service(put_setting)
            .service(delete_setting)
            .service(moderate)
    );
}
