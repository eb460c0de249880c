use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "showcase_slider_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub showcase_id: i32,
    pub file_name: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::showcases::Entity",
        from = "Column::ShowcaseId",
        to = "super::showcases::Column::Id",
        on_delete = "Cascade"
    )]
    Showcase,
}

impl Related<super::showcases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Showcase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
