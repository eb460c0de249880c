use sea_orm_migration::prelude::*;

use super::support::{create_enum, drop_enum, enum_column};

pub(crate) const DATASET_TYPE_ENUM: &str = "datasets_dataset_type_enum";
pub(crate) const UPDATE_FREQUENCY_UNIT_ENUM: &str = "datasets_update_frequency_unit_enum";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_enum(manager, DATASET_TYPE_ENUM, &["open", "controlled"]).await?;
        create_enum(
            manager,
            UPDATE_FREQUENCY_UNIT_ENUM,
            &["minutes", "hours", "days", "weeks", "months"],
        )
        .await?;

        let mut datasets = Table::create();
        datasets.table(Datasets::Table);
        for column in dataset_columns(manager, false) {
            datasets.col(column);
        }
        datasets.foreign_key(&mut dataset_owner_fk(Datasets::Table));
        manager.create_table(datasets).await?;
        manager.create_index(dataset_owner_index()).await?;

        manager
            .create_table(
                Table::create()
                    .table(DatasetLinks::Table)
                    .col(ColumnDef::new(DatasetLinks::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DatasetLinks::DatasetId).integer().not_null())
                    .col(ColumnDef::new(DatasetLinks::Name).string().not_null())
                    .col(ColumnDef::new(DatasetLinks::Url).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_links_dataset_id")
                            .from(DatasetLinks::Table, DatasetLinks::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager.create_index(dataset_links_url_unique()).await?;

        manager
            .create_table(
                Table::create()
                    .table(DatasetLocations::Table)
                    .col(ColumnDef::new(DatasetLocations::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DatasetLocations::DatasetId).integer().not_null())
                    .col(ColumnDef::new(DatasetLocations::Name).string())
                    .col(ColumnDef::new(DatasetLocations::Latitude).double().not_null())
                    .col(ColumnDef::new(DatasetLocations::Longitude).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_locations_dataset_id")
                            .from(DatasetLocations::Table, DatasetLocations::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DatasetSliderImages::Table)
                    .col(ColumnDef::new(DatasetSliderImages::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DatasetSliderImages::DatasetId).integer().not_null())
                    .col(ColumnDef::new(DatasetSliderImages::FileName).string().not_null())
                    .col(ColumnDef::new(DatasetSliderImages::Position).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_slider_images_dataset_id")
                            .from(DatasetSliderImages::Table, DatasetSliderImages::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DatasetTags::Table)
                    .col(ColumnDef::new(DatasetTags::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DatasetTags::Name).string().not_null())
                    .col(ColumnDef::new(DatasetTags::Colour).string())
                    .col(ColumnDef::new(DatasetTags::Icon).string())
                    .col(ColumnDef::new(DatasetTags::OrderInNavbar).integer())
                    .col(
                        ColumnDef::new(DatasetTags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DatasetTags::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DatasetTags::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Table de jointure many-to-many: le cycle de vie d'un tag ne dépend
        // d'aucun dataset, seule la ligne de jointure part en cascade
        manager
            .create_table(
                Table::create()
                    .table(DatasetTagsDatasets::Table)
                    .col(ColumnDef::new(DatasetTagsDatasets::DatasetId).integer().not_null())
                    .col(ColumnDef::new(DatasetTagsDatasets::DatasetTagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(DatasetTagsDatasets::DatasetId)
                            .col(DatasetTagsDatasets::DatasetTagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_tags_datasets_dataset_id")
                            .from(DatasetTagsDatasets::Table, DatasetTagsDatasets::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dataset_tags_datasets_dataset_tag_id")
                            .from(DatasetTagsDatasets::Table, DatasetTagsDatasets::DatasetTagId)
                            .to(DatasetTags::Table, DatasetTags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, table, column) in [
            ("idx_dataset_links_dataset_id", DatasetLinks::Table.into_iden(), DatasetLinks::DatasetId.into_iden()),
            ("idx_dataset_locations_dataset_id", DatasetLocations::Table.into_iden(), DatasetLocations::DatasetId.into_iden()),
            ("idx_dataset_slider_images_dataset_id", DatasetSliderImages::Table.into_iden(), DatasetSliderImages::DatasetId.into_iden()),
            ("idx_dataset_tags_datasets_dataset_id", DatasetTagsDatasets::Table.into_iden(), DatasetTagsDatasets::DatasetId.into_iden()),
            ("idx_dataset_tags_datasets_dataset_tag_id", DatasetTagsDatasets::Table.into_iden(), DatasetTagsDatasets::DatasetTagId.into_iden()),
        ] {
            manager
                .create_index(Index::create().name(name).table(table).col(column).to_owned())
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            DatasetTagsDatasets::Table.into_iden(),
            DatasetTags::Table.into_iden(),
            DatasetSliderImages::Table.into_iden(),
            DatasetLocations::Table.into_iden(),
            DatasetLinks::Table.into_iden(),
            Datasets::Table.into_iden(),
        ] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }

        drop_enum(manager, UPDATE_FREQUENCY_UNIT_ENUM).await?;
        drop_enum(manager, DATASET_TYPE_ENUM).await
    }
}

/// Colonnes de `datasets` telles que créées ici. Réutilisées par la
/// reconstruction SQLite qui rend `user_id` obligatoire.
pub(crate) fn dataset_columns(manager: &SchemaManager<'_>, owner_required: bool) -> Vec<ColumnDef> {
    let mut owner = ColumnDef::new(Datasets::UserId);
    owner.uuid();
    if owner_required {
        owner.not_null();
    }

    vec![
        ColumnDef::new(Datasets::Id).integer().not_null().auto_increment().primary_key().to_owned(),
        ColumnDef::new(Datasets::Name).string().not_null().to_owned(),
        enum_column(manager, Datasets::DatasetType, DATASET_TYPE_ENUM).not_null().to_owned(),
        ColumnDef::new(Datasets::Description).text().not_null().to_owned(),
        ColumnDef::new(Datasets::UpdateFrequency).integer().to_owned(),
        enum_column(manager, Datasets::UpdateFrequencyUnit, UPDATE_FREQUENCY_UNIT_ENUM),
        ColumnDef::new(Datasets::MqttAddress).string().to_owned(),
        ColumnDef::new(Datasets::MqttPort).integer().to_owned(),
        ColumnDef::new(Datasets::MqttTopic).string().to_owned(),
        ColumnDef::new(Datasets::MqttUsername).string().to_owned(),
        ColumnDef::new(Datasets::MqttPassword).string().to_owned(),
        owner,
        ColumnDef::new(Datasets::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .to_owned(),
        ColumnDef::new(Datasets::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .to_owned(),
        ColumnDef::new(Datasets::DeletedAt).timestamp_with_time_zone().to_owned(),
    ]
}

pub(crate) const DATASET_COLUMN_NAMES: &[&str] = &[
    "id",
    "name",
    "dataset_type",
    "description",
    "update_frequency",
    "update_frequency_unit",
    "mqtt_address",
    "mqtt_port",
    "mqtt_topic",
    "mqtt_username",
    "mqtt_password",
    "user_id",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub(crate) fn dataset_owner_fk<T: IntoIden + 'static>(table: T) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name("fk_datasets_user_id")
        .from(table, Datasets::UserId)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

pub(crate) fn dataset_owner_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_datasets_user_id")
        .table(Datasets::Table)
        .col(Datasets::UserId)
        .to_owned()
}

pub(crate) fn dataset_links_url_unique() -> IndexCreateStatement {
    Index::create()
        .name("uq_dataset_links_url")
        .table(DatasetLinks::Table)
        .col(DatasetLinks::Url)
        .unique()
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum Datasets {
    Table,
    Id,
    Name,
    DatasetType,
    Description,
    UpdateFrequency,
    UpdateFrequencyUnit,
    MqttAddress,
    MqttPort,
    MqttTopic,
    MqttUsername,
    MqttPassword,
    UserId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum DatasetLinks {
    Table,
    Id,
    DatasetId,
    Name,
    Url,
}

#[derive(DeriveIden)]
enum DatasetLocations {
    Table,
    Id,
    DatasetId,
    Name,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
enum DatasetSliderImages {
    Table,
    Id,
    DatasetId,
    FileName,
    Position,
}

#[derive(DeriveIden)]
enum DatasetTags {
    Table,
    Id,
    Name,
    Colour,
    Icon,
    OrderInNavbar,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum DatasetTagsDatasets {
    Table,
    DatasetId,
    DatasetTagId,
}
