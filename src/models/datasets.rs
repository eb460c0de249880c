use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::SoftDeletable;
use super::moderation::{ModeratedEntity, Moderated};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "datasets_dataset_type_enum")]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "controlled")]
    Controlled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "datasets_update_frequency_unit_enum")]
#[serde(rename_all = "lowercase")]
pub enum UpdateFrequencyUnit {
    #[sea_orm(string_value = "minutes")]
    Minutes,
    #[sea_orm(string_value = "hours")]
    Hours,
    #[sea_orm(string_value = "days")]
    Days,
    #[sea_orm(string_value = "weeks")]
    Weeks,
    #[sea_orm(string_value = "months")]
    Months,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub dataset_type: DatasetType,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub update_frequency: Option<i32>,
    pub update_frequency_unit: Option<UpdateFrequencyUnit>,
    pub mqtt_address: Option<String>,
    pub mqtt_port: Option<i32>,
    pub mqtt_topic: Option<String>,
    pub mqtt_username: Option<String>,
    #[serde(skip_serializing)] // Jamais renvoyé par l'API
    pub mqtt_password: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub denied_at: Option<DateTimeWithTimeZone>,
    pub order_in_homepage: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::dataset_links::Entity")]
    Links,

    #[sea_orm(has_many = "super::dataset_locations::Entity")]
    Locations,

    #[sea_orm(has_many = "super::dataset_slider_images::Entity")]
    SliderImages,

    #[sea_orm(has_many = "super::showcases::Entity")]
    Showcases,

    #[sea_orm(has_many = "super::access_requests::Entity")]
    AccessRequests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::dataset_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl Related<super::dataset_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl Related<super::dataset_slider_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SliderImages.def()
    }
}

impl Related<super::showcases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Showcases.def()
    }
}

impl Related<super::access_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccessRequests.def()
    }
}

// Many-to-many via dataset_tags_datasets
impl Related<super::dataset_tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::dataset_tags_datasets::Relation::DatasetTag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dataset_tags_datasets::Relation::Dataset.def().rev())
    }
}

impl Moderated for Model {
    fn approved_at(&self) -> Option<DateTimeWithTimeZone> {
        self.approved_at
    }

    fn denied_at(&self) -> Option<DateTimeWithTimeZone> {
        self.denied_at
    }
}

impl SoftDeletable for Model {
    fn deleted_at(&self) -> Option<DateTimeWithTimeZone> {
        self.deleted_at
    }
}

impl ModeratedEntity for Entity {
    const LABEL: &'static str = "Dataset";
    const ID: Column = Column::Id;
    const APPROVED_AT: Column = Column::ApprovedAt;
    const DENIED_AT: Column = Column::DeniedAt;
    const DELETED_AT: Column = Column::DeletedAt;
}

impl ActiveModelBehavior for ActiveModel {}
