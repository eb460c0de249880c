use chrono::Utc;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::support::{count_rows, execute_sql};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite n'accepte qu'une modification par ALTER TABLE
        for column in moderation_columns() {
            manager
                .alter_table(Table::alter().table(Datasets::Table).add_column(column).to_owned())
                .await?;
        }
        manager
            .alter_table(
                Table::alter()
                    .table(Datasets::Table)
                    .add_column(ColumnDef::new(Datasets::OrderInHomepage).integer())
                    .to_owned(),
            )
            .await?;
        for column in moderation_columns() {
            manager
                .alter_table(Table::alter().table(DatasetTags::Table).add_column(column).to_owned())
                .await?;
        }

        // Rattrapage ponctuel: tout ce qui existait avant la modération
        // est considéré comme approuvé
        let now = Utc::now().fixed_offset();
        let backend = manager.get_database_backend();
        let db = manager.get_connection();

        let stamp_datasets = Query::update()
            .table(Datasets::Table)
            .value(Datasets::ApprovedAt, now)
            .and_where(Expr::col(Datasets::ApprovedAt).is_null())
            .and_where(Expr::col(Datasets::DeniedAt).is_null())
            .to_owned();
        db.execute(backend.build(&stamp_datasets)).await?;

        let stamp_tags = Query::update()
            .table(DatasetTags::Table)
            .value(DatasetTags::ApprovedAt, now)
            .and_where(Expr::col(DatasetTags::ApprovedAt).is_null())
            .and_where(Expr::col(DatasetTags::DeniedAt).is_null())
            .to_owned();
        db.execute(backend.build(&stamp_tags)).await?;

        // Datasets sans propriétaire: rattachés au plus ancien admin
        execute_sql(
            manager,
            r#"UPDATE "datasets" SET "user_id" = (
                SELECT "id" FROM "users"
                WHERE "is_admin" = TRUE AND "deleted_at" IS NULL
                ORDER BY "created_at" ASC
                LIMIT 1
            ) WHERE "user_id" IS NULL"#,
        )
        .await?;

        let orphans = count_rows(
            manager,
            r#"SELECT COUNT(*) AS count FROM "datasets" WHERE "user_id" IS NULL"#,
        )
        .await?;
        if orphans > 0 {
            log::warn!(
                "{} dataset(s) still have no owner (no admin user to adopt them); \
                 assign them before the owner column is made mandatory",
                orphans
            );
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in [Moderation::ApprovedAt, Moderation::DeniedAt] {
            manager
                .alter_table(Table::alter().table(DatasetTags::Table).drop_column(column).to_owned())
                .await?;
        }
        for column in [
            Datasets::OrderInHomepage.into_iden(),
            Datasets::DeniedAt.into_iden(),
            Datasets::ApprovedAt.into_iden(),
        ] {
            manager
                .alter_table(Table::alter().table(Datasets::Table).drop_column(column).to_owned())
                .await?;
        }
        Ok(())
    }
}

/// Les deux horodatages de modération, dans l'ordre où ils sont ajoutés.
pub(crate) fn moderation_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(Moderation::ApprovedAt).timestamp_with_time_zone().to_owned(),
        ColumnDef::new(Moderation::DeniedAt).timestamp_with_time_zone().to_owned(),
    ]
}

pub(crate) fn dataset_moderation_columns() -> Vec<ColumnDef> {
    let mut columns = moderation_columns();
    columns.push(ColumnDef::new(Datasets::OrderInHomepage).integer().to_owned());
    columns
}

pub(crate) const DATASET_MODERATION_COLUMN_NAMES: &[&str] =
    &["approved_at", "denied_at", "order_in_homepage"];

#[derive(DeriveIden)]
enum Moderation {
    ApprovedAt,
    DeniedAt,
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    ApprovedAt,
    DeniedAt,
    OrderInHomepage,
}

#[derive(DeriveIden)]
enum DatasetTags {
    Table,
    ApprovedAt,
    DeniedAt,
}
