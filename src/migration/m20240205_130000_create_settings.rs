use sea_orm_migration::prelude::*;

use super::support::{create_enum, drop_enum, enum_column};

pub(crate) const SETTING_DATA_TYPE_ENUM: &str = "settings_data_type_enum";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_enum(
            manager,
            SETTING_DATA_TYPE_ENUM,
            &["string", "number", "boolean", "json", "html"],
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .col(ColumnDef::new(Settings::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Settings::Key).string().not_null())
                    .col(ColumnDef::new(Settings::Value).text().not_null())
                    .col(
                        enum_column(manager, Settings::DataType, SETTING_DATA_TYPE_ENUM)
                            .not_null()
                            .default("string"),
                    )
                    .col(
                        ColumnDef::new(Settings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Settings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_settings_key")
                    .table(Settings::Table)
                    .col(Settings::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await?;

        drop_enum(manager, SETTING_DATA_TYPE_ENUM).await
    }
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    Key,
    Value,
    DataType,
    CreatedAt,
    UpdatedAt,
}
