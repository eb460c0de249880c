use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

use super::lifecycle::SoftDeletable;

/// Valeurs courantes de `users_type_enum` (après l'élargissement de l'enum)
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "users_type_enum")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "government")]
    Government,
    #[sea_orm(string_value = "business")]
    Business,
    #[sea_orm(string_value = "academic")]
    Academic,
    #[sea_orm(string_value = "non_profit")]
    NonProfit,
    #[sea_orm(string_value = "individual")]
    Individual,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(skip_serializing)] // Format: pbkdf2:sha256:iterations$salt$hash
    pub password: String,
    pub is_admin: bool,
    pub is_activated: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::datasets::Entity")]
    Datasets,

    #[sea_orm(has_many = "super::showcases::Entity")]
    Showcases,

    #[sea_orm(has_many = "super::access_requests::Entity")]
    AccessRequests,
}

impl Related<super::datasets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Datasets.def()
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

impl SoftDeletable for Model {
    fn deleted_at(&self) -> Option<DateTimeWithTimeZone> {
        self.deleted_at
    }
}

impl ActiveModelBehavior for ActiveModel {}
