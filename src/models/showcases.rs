use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::SoftDeletable;
use super::moderation::{ModeratedEntity, Moderated};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "showcases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub youtube_link: Option<String>,
    pub user_id: Uuid,
    pub dataset_id: Option<i32>, // NULL si le dataset a été supprimé
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub denied_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
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

    #[sea_orm(
        belongs_to = "super::datasets::Entity",
        from = "Column::DatasetId",
        to = "super::datasets::Column::Id",
        on_delete = "SetNull"
    )]
    Dataset,

    #[sea_orm(has_many = "super::showcase_locations::Entity")]
    Locations,

    #[sea_orm(has_many = "super::showcase_slider_images::Entity")]
    SliderImages,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::datasets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl Related<super::showcase_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl Related<super::showcase_slider_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SliderImages.def()
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
    const LABEL: &'static str = "Showcase";
    const ID: Column = Column::Id;
    const APPROVED_AT: Column = Column::ApprovedAt;
    const DENIED_AT: Column = Column::DeniedAt;
    const DELETED_AT: Column = Column::DeletedAt;
}

impl ActiveModelBehavior for ActiveModel {}
