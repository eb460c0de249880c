use actix_web::{delete, get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{DatasetListQuery, DatasetRequest};
use crate::routes::access_requests::create_access_request;
use crate::services::dataset_service::DatasetService;

/// GET /datasets - Datasets publiés (PUBLIC), filtres ?tag=<id>&dataset_type=open|controlled
#[get("")]
pub async fn list_datasets(
    db: web::Data<DatabaseConnection>,
    query: web::Query<DatasetListQuery>,
) -> Result<HttpResponse, AppError> {
    let datasets = DatasetService::list_public(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(datasets))
}

/// GET /datasets/mine - Datasets de l'utilisateur, quel que soit leur état de modération
#[get("/mine")]
pub async fn my_datasets(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let datasets = DatasetService::list_for_owner(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(datasets))
}

/// GET /datasets/{id} - Publié, ou visible par son propriétaire / un admin
#[get("/{id}")]
pub async fn get_dataset(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    auth_user: Option<AuthUser>,
) -> Result<HttpResponse, AppError> {
    let dataset = DatasetService::get_visible(db.get_ref(), path.into_inner(), auth_user.as_ref()).await?;
    Ok(HttpResponse::Ok().json(dataset))
}

#[post("")]
pub async fn create_dataset(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    body: web::Json<DatasetRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let dataset = DatasetService::create(db.get_ref(), auth_user.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(dataset))
}

#[put("/{id}")]
pub async fn update_dataset(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<DatasetRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let dataset =
        DatasetService::update(db.get_ref(), path.into_inner(), &auth_user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(dataset))
}

#[delete("/{id}")]
pub async fn delete_dataset(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    DatasetService::soft_delete(db.get_ref(), path.into_inner(), &auth_user).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /datasets/{id}/tags/{tag_id}/toggle - Ajoute ou retire un tag
#[post("/{id}/tags/{tag_id}/toggle")]
pub async fn toggle_dataset_tag(
    db: web::Data<DatabaseConnection>,
    auth_user: AuthUser,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (id, tag_id) = path.into_inner();
    let outcome = DatasetService::toggle_tag(db.get_ref(), id, tag_id, &auth_user).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub fn datasets_routes(cfg: &mut web::ServiceConfig) {
    // "/mine" doit être enregistré avant "/{id}"
    cfg.service(
        web::scope("/datasets")
            .service(list_datasets)
            .service(my_datasets)
            .service(get_dataset)
            .service(create_dataset)
            .service(update_dataset)
            .service(delete_dataset)
            .service(toggle_dataset_tag)
            .service(create_access_request)
    );
}
