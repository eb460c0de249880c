use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::access_requests;
use crate::models::datasets::DatasetType;
use crate::models::dto::AccessRequestRequest;
use crate::models::moderation::Moderated;
use crate::services::dataset_service::DatasetService;

pub struct AccessRequestService;

impl AccessRequestService {
    /// Demande d'accès à un dataset contrôlé et publié
    pub async fn create(
        db: &DatabaseConnection,
        dataset_id: i32,
        user_id: Uuid,
        request: AccessRequestRequest,
    ) -> Result<access_requests::Model, AppError> {
        let dataset = DatasetService::find_active(db, dataset_id).await?;
        if !dataset.is_published() {
            return Err(AppError::NotFound("Dataset"));
        }
        if dataset.dataset_type != DatasetType::Controlled {
            return Err(AppError::BadRequest("Dataset is open, no access request needed".to_string()));
        }

        let department = request
            .department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let now = Utc::now().fixed_offset();
        let created = access_requests::ActiveModel {
            dataset_id: Set(dataset_id),
            user_id: Set(user_id),
            department: Set(department),
            reason: Set(request.reason),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;

        log::info!("Access request {} on dataset {} by {}", created.id, dataset_id, user_id);
        Ok(created)
    }

    pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<access_requests::Model>, AppError> {
        Ok(access_requests::Entity::find()
            .filter(access_requests::Column::UserId.eq(user_id))
            .filter(access_requests::Column::DeletedAt.is_null())
            .order_by_desc(access_requests::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn list_for_dataset(
        db: &DatabaseConnection,
        dataset_id: i32,
    ) -> Result<Vec<access_requests::Model>, AppError> {
        DatasetService::find_active(db, dataset_id).await?;

        Ok(access_requests::Entity::find()
            .filter(access_requests::Column::DatasetId.eq(dataset_id))
            .filter(access_requests::Column::DeletedAt.is_null())
            .order_by_desc(access_requests::Column::CreatedAt)
            .all(db)
            .await?)
    }
}
