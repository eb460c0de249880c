// Corps des requêtes (validés avec validator) et réponses structurées de l'API

use sea_orm::entity::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::datasets::{DatasetType, UpdateFrequencyUnit};
use super::lifecycle::Lifecycle;
use super::moderation::ModerationStatus;
use super::settings::{SettingDataType, SettingValue};
use super::users::UserType;
use super::{dataset_links, dataset_locations, dataset_slider_images, dataset_tags, datasets};
use super::{showcase_locations, showcase_slider_images, showcases, users};

// ----------------------------------------------------------------------------
// Auth
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub company: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    #[validate(length(min = 8, max = 1000))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, max = 1000))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: users::Model,
}

// ----------------------------------------------------------------------------
// Datasets
// ----------------------------------------------------------------------------

/// Tag tel qu'envoyé par l'éditeur de tags: `id` n'est fiable que s'il
/// correspond à un tag existant
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TagRef {
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LinkInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationInput {
    pub name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DatasetRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub dataset_type: DatasetType,
    pub description: String,
    #[validate(range(min = 1))]
    pub update_frequency: Option<i32>,
    pub update_frequency_unit: Option<UpdateFrequencyUnit>,
    pub mqtt_address: Option<String>,
    #[validate(range(min = 1, max = 65535))]
    pub mqtt_port: Option<i32>,
    pub mqtt_topic: Option<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub links: Vec<LinkInput>,
    #[serde(default)]
    #[validate(nested)]
    pub locations: Vec<LocationInput>,
    /// Noms de fichiers renvoyés par POST /api/uploads, dans l'ordre du carrousel
    #[serde(default)]
    pub slider_images: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetListQuery {
    pub tag: Option<i32>,
    pub dataset_type: Option<DatasetType>,
}

#[derive(Debug, Deserialize)]
pub struct HomepageOrderRequest {
    pub order_in_homepage: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    #[serde(flatten)]
    pub dataset: datasets::Model,
    pub moderation: ModerationStatus,
    pub lifecycle: Lifecycle,
    pub links: Vec<dataset_links::Model>,
    pub locations: Vec<dataset_locations::Model>,
    pub slider_images: Vec<dataset_slider_images::Model>,
    pub tags: Vec<dataset_tags::Model>,
}

#[derive(Debug, Serialize)]
pub struct TagToggleResponse {
    pub dataset_id: i32,
    pub tag_id: i32,
    pub attached: bool,
}

// ----------------------------------------------------------------------------
// Tags
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(max = 32))]
    pub colour: Option<String>,
    #[validate(length(max = 100))]
    pub icon: Option<String>,
    pub order_in_navbar: Option<i32>,
}

// ----------------------------------------------------------------------------
// Showcases
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShowcaseRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: String,
    #[validate(url)]
    pub youtube_link: Option<String>,
    pub dataset_id: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub locations: Vec<LocationInput>,
    #[serde(default)]
    pub slider_images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ShowcaseResponse {
    #[serde(flatten)]
    pub showcase: showcases::Model,
    pub moderation: ModerationStatus,
    pub lifecycle: Lifecycle,
    pub locations: Vec<showcase_locations::Model>,
    pub slider_images: Vec<showcase_slider_images::Model>,
}

// ----------------------------------------------------------------------------
// Settings
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SettingRequest {
    pub data_type: SettingDataType,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub data_type: SettingDataType,
    pub value: SettingValue,
    pub updated_at: DateTimeWithTimeZone,
}

// ----------------------------------------------------------------------------
// Access requests
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct AccessRequestRequest {
    #[validate(length(max = 255))]
    pub department: Option<String>,
    #[validate(length(max = 5000))]
    pub reason: Option<String>,
}

// ----------------------------------------------------------------------------
// Admin
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ModerationListQuery {
    pub status: Option<super::moderation::ModerationFilter>,
}

#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub id: i32,
    pub moderation: ModerationStatus,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub is_activated: bool,
    pub lifecycle: Lifecycle,
}
