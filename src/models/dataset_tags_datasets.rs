use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Table de jointure datasets <-> dataset_tags
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dataset_tags_datasets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dataset_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dataset_tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::datasets::Entity",
        from = "Column::DatasetId",
        to = "super::datasets::Column::Id",
        on_delete = "Cascade"
    )]
    Dataset,

    #[sea_orm(
        belongs_to = "super::dataset_tags::Entity",
        from = "Column::DatasetTagId",
        to = "super::dataset_tags::Column::Id",
        on_delete = "Cascade"
    )]
    DatasetTag,
}

impl ActiveModelBehavior for ActiveModel {}
