use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use futures::TryStreamExt;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::UploadResponse;
use crate::utils::uploads::{UploadError, UploadStore};

/// POST /uploads - multipart, champ `file`
/// Retourne le nom à placer dans `slider_images` et l'URL publique
#[post("")]
pub async fn upload_file(
    store: web::Data<UploadStore>,
    auth_user: AuthUser,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let disposition = field.content_disposition();
        if disposition.get_name() != Some("file") {
            continue;
        }
        let original_name = disposition
            .get_filename()
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest("Missing file name".to_string()))?;

        // Lecture par morceaux, on coupe dès que la limite est dépassée
        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            if data.len() + chunk.len() > store.max_bytes() {
                return Err(UploadError::TooLarge(store.max_bytes()).into());
            }
            data.extend_from_slice(&chunk);
        }

        let file_name = store.store(&original_name, data).await?;
        log::info!("Upload {} stored for {}", file_name, auth_user.user_id);

        return Ok(HttpResponse::Created().json(UploadResponse {
            url: store.public_url(&file_name),
            file_name,
        }));
    }

    Err(AppError::BadRequest("Missing multipart field 'file'".to_string()))
}

pub fn uploads_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/uploads").service(upload_file));
}
