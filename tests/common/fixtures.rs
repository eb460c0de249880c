//! Données de test créées directement via l'ORM ou les services

use catalogue_backend::error::AppError;
use catalogue_backend::models::datasets::DatasetType;
use catalogue_backend::models::dto::{DatasetRequest, DatasetResponse, LinkInput, TagRef};
use catalogue_backend::models::users::{self, UserType};
use catalogue_backend::services::dataset_service::DatasetService;
use catalogue_backend::utils::jwt::JwtConfig;
use catalogue_backend::utils::password::hash_password;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr};
use uuid::Uuid;

use super::database::TEST_JWT_SECRET;

pub const TEST_PASSWORD: &str = "password123";

pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    is_admin: bool,
    is_activated: bool,
) -> Result<users::Model, DbErr> {
    let password = hash_password(TEST_PASSWORD).map_err(|e| DbErr::Custom(e.to_string()))?;
    let now = Utc::now().fixed_offset();

    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set("Test User".to_string()),
        company: Set(None),
        user_type: Set(UserType::Academic),
        password: Set(password),
        is_admin: Set(is_admin),
        is_activated: Set(is_activated),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
}

pub fn dataset_request(name: &str) -> DatasetRequest {
    DatasetRequest {
        name: name.to_string(),
        dataset_type: DatasetType::Open,
        description: format!("Description of {}", name),
        update_frequency: Some(1),
        update_frequency_unit: None,
        mqtt_address: None,
        mqtt_port: None,
        mqtt_topic: None,
        mqtt_username: None,
        mqtt_password: None,
        links: vec![LinkInput {
            name: "Portal".to_string(),
            url: "https://data.example.org/portal".to_string(),
        }],
        locations: vec![],
        slider_images: vec![],
        tags: vec![TagRef {
            id: None,
            name: "Mobility".to_string(),
        }],
    }
}

pub async fn create_test_dataset(
    db: &DatabaseConnection,
    owner_id: Uuid,
    name: &str,
) -> Result<DatasetResponse, AppError> {
    DatasetService::create(db, owner_id, dataset_request(name)).await
}

pub fn bearer_for(user: &users::Model) -> String {
    let token = JwtConfig::new(TEST_JWT_SECRET.to_string(), 1)
        .generate_token(user.id, &user.email, user.is_admin)
        .expect("Failed to generate token");
    format!("Bearer {}", token)
}
