use chrono::Utc;
use sea_orm::*;

use crate::error::AppError;
use crate::models::dto::{SettingRequest, SettingResponse};
use crate::models::settings::{self, SettingValue};

pub struct SettingService;

impl SettingService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<SettingResponse>, AppError> {
        let rows = settings::Entity::find()
            .order_by_asc(settings::Column::Key)
            .all(db)
            .await?;

        // Une ligne illisible (écrite hors de l'API) ne doit pas masquer les autres
        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            match Self::to_response(&row) {
                Ok(response) => responses.push(response),
                Err(e) => log::warn!("Skipping setting '{}': {}", row.key, e),
            }
        }
        Ok(responses)
    }

    pub async fn get(db: &DatabaseConnection, key: &str) -> Result<SettingResponse, AppError> {
        let row = Self::find(db, key.trim()).await?.ok_or(AppError::NotFound("Setting"))?;
        Self::to_response(&row)
    }

    /// Crée ou remplace un réglage. La valeur est validée contre son type
    /// avant toute écriture.
    pub async fn upsert(
        db: &DatabaseConnection,
        key: &str,
        request: SettingRequest,
    ) -> Result<SettingResponse, AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::Validation("Setting key cannot be empty".to_string()));
        }

        let value = SettingValue::parse(request.data_type, &request.value)?;
        let now = Utc::now().fixed_offset();

        let saved = match Self::find(db, key).await? {
            Some(existing) => {
                let mut active: settings::ActiveModel = existing.into();
                active.value = Set(value.to_raw());
                active.data_type = Set(request.data_type);
                active.updated_at = Set(now);
                active.update(db).await?
            }
            None => {
                settings::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value.to_raw()),
                    data_type: Set(request.data_type),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };

        Ok(SettingResponse {
            key: saved.key,
            data_type: saved.data_type,
            value,
            updated_at: saved.updated_at,
        })
    }

    pub async fn delete(db: &DatabaseConnection, key: &str) -> Result<(), AppError> {
        let result = settings::Entity::delete_many()
            .filter(settings::Column::Key.eq(key.trim()))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Setting"));
        }
        Ok(())
    }

    async fn find(db: &DatabaseConnection, key: &str) -> Result<Option<settings::Model>, DbErr> {
        settings::Entity::find()
            .filter(settings::Column::Key.eq(key))
            .one(db)
            .await
    }

    fn to_response(row: &settings::Model) -> Result<SettingResponse, AppError> {
        Ok(SettingResponse {
            key: row.key.clone(),
            data_type: row.data_type,
            value: row.typed_value()?,
            updated_at: row.updated_at,
        })
    }
}
