use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Showcases::Table)
                    .col(ColumnDef::new(Showcases::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Showcases::Title).string().not_null())
                    .col(ColumnDef::new(Showcases::Description).text().not_null())
                    .col(ColumnDef::new(Showcases::YoutubeLink).string())
                    .col(ColumnDef::new(Showcases::UserId).uuid().not_null())
                    .col(ColumnDef::new(Showcases::DatasetId).integer())
                    .col(ColumnDef::new(Showcases::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Showcases::DeniedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Showcases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Showcases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Showcases::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_showcases_user_id")
                            .from(Showcases::Table, Showcases::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // Un showcase survit à la suppression de son dataset
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_showcases_dataset_id")
                            .from(Showcases::Table, Showcases::DatasetId)
                            .to(Datasets::Table, Datasets::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShowcaseLocations::Table)
                    .col(ColumnDef::new(ShowcaseLocations::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(ShowcaseLocations::ShowcaseId).integer().not_null())
                    .col(ColumnDef::new(ShowcaseLocations::Name).string())
                    .col(ColumnDef::new(ShowcaseLocations::Latitude).double().not_null())
                    .col(ColumnDef::new(ShowcaseLocations::Longitude).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_showcase_locations_showcase_id")
                            .from(ShowcaseLocations::Table, ShowcaseLocations::ShowcaseId)
                            .to(Showcases::Table, Showcases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShowcaseSliderImages::Table)
                    .col(ColumnDef::new(ShowcaseSliderImages::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(ShowcaseSliderImages::ShowcaseId).integer().not_null())
                    .col(ColumnDef::new(ShowcaseSliderImages::FileName).string().not_null())
                    .col(ColumnDef::new(ShowcaseSliderImages::Position).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_showcase_slider_images_showcase_id")
                            .from(ShowcaseSliderImages::Table, ShowcaseSliderImages::ShowcaseId)
                            .to(Showcases::Table, Showcases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_showcases_title")
                    .table(Showcases::Table)
                    .col(Showcases::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, table, column) in [
            ("idx_showcases_user_id", Showcases::Table.into_iden(), Showcases::UserId.into_iden()),
            ("idx_showcases_dataset_id", Showcases::Table.into_iden(), Showcases::DatasetId.into_iden()),
            ("idx_showcase_locations_showcase_id", ShowcaseLocations::Table.into_iden(), ShowcaseLocations::ShowcaseId.into_iden()),
            ("idx_showcase_slider_images_showcase_id", ShowcaseSliderImages::Table.into_iden(), ShowcaseSliderImages::ShowcaseId.into_iden()),
        ] {
            manager
                .create_index(Index::create().name(name).table(table).col(column).to_owned())
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            ShowcaseSliderImages::Table.into_iden(),
            ShowcaseLocations::Table.into_iden(),
            Showcases::Table.into_iden(),
        ] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Showcases {
    Table,
    Id,
    Title,
    Description,
    YoutubeLink,
    UserId,
    DatasetId,
    ApprovedAt,
    DeniedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum ShowcaseLocations {
    Table,
    Id,
    ShowcaseId,
    Name,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
enum ShowcaseSliderImages {
    Table,
    Id,
    ShowcaseId,
    FileName,
    Position,
}
