use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::SoftDeletable;
use super::moderation::{ModeratedEntity, Moderated};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dataset_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub colour: Option<String>,
    pub icon: Option<String>,
    pub order_in_navbar: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub denied_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::datasets::Entity> for Entity {
    fn to() -> RelationDef {
        super::dataset_tags_datasets::Relation::Dataset.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::dataset_tags_datasets::Relation::DatasetTag.def().rev())
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
    const LABEL: &'static str = "Tag";
    const ID: Column = Column::Id;
    const APPROVED_AT: Column = Column::ApprovedAt;
    const DENIED_AT: Column = Column::DeniedAt;
    const DELETED_AT: Column = Column::DeletedAt;
}

impl ActiveModelBehavior for ActiveModel {}
