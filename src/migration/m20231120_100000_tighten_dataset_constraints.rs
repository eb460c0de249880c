use sea_orm_migration::prelude::*;

use super::m20231002_090000_create_datasets::{
    DATASET_COLUMN_NAMES, dataset_columns, dataset_links_url_unique, dataset_owner_fk,
    dataset_owner_index,
};
use super::m20231106_160000_add_moderation::{
    DATASET_MODERATION_COLUMN_NAMES, dataset_moderation_columns,
};
use super::support::{
    ensure_no_violations, is_postgres, rebuild_sqlite_table, set_column_nullable_postgres,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Toutes les vérifications avant la moindre modification du schéma
        ensure_no_violations(
            manager,
            r#"SELECT COUNT(*) AS count FROM "datasets" WHERE "user_id" IS NULL"#,
            "NOT NULL on datasets.user_id",
        )
        .await?;
        ensure_no_violations(
            manager,
            r#"SELECT COUNT(*) AS count FROM (
                SELECT "name" FROM "datasets" GROUP BY "name" HAVING COUNT(*) > 1
            ) AS duplicates"#,
            "UNIQUE on datasets.name",
        )
        .await?;
        ensure_no_violations(
            manager,
            r#"SELECT COUNT(*) AS count FROM (
                SELECT "name" FROM "dataset_tags" GROUP BY "name" HAVING COUNT(*) > 1
            ) AS duplicates"#,
            "UNIQUE on dataset_tags.name",
        )
        .await?;

        set_dataset_owner_required(manager, true).await?;

        manager.create_index(datasets_name_unique()).await?;
        manager.create_index(dataset_tags_name_unique()).await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uq_dataset_links_url")
                    .table(DatasetLinks::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        ensure_no_violations(
            manager,
            r#"SELECT COUNT(*) AS count FROM (
                SELECT "url" FROM "dataset_links" GROUP BY "url" HAVING COUNT(*) > 1
            ) AS duplicates"#,
            "UNIQUE on dataset_links.url",
        )
        .await?;

        manager.create_index(dataset_links_url_unique()).await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uq_dataset_tags_name")
                    .table(DatasetTags::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uq_datasets_name")
                    .table(Datasets::Table)
                    .to_owned(),
            )
            .await?;

        set_dataset_owner_required(manager, false).await
    }
}

async fn set_dataset_owner_required(manager: &SchemaManager<'_>, required: bool) -> Result<(), DbErr> {
    if is_postgres(manager) {
        return set_column_nullable_postgres(manager, "datasets", "user_id", !required).await;
    }

    let columns: Vec<&str> = DATASET_COLUMN_NAMES
        .iter()
        .chain(DATASET_MODERATION_COLUMN_NAMES)
        .copied()
        .collect();

    // Seuls les index propres à `datasets` disparaissent avec la table.
    // L'index unique sur le nom est créé (ou a été supprimé) par l'appelant.
    rebuild_sqlite_table(
        manager,
        "datasets",
        &columns,
        |table| {
            let mut statement = Table::create();
            statement.table(table.clone());
            for column in dataset_columns(manager, required)
                .into_iter()
                .chain(dataset_moderation_columns())
            {
                statement.col(column);
            }
            statement.foreign_key(&mut dataset_owner_fk(table));
            statement
        },
        vec![dataset_owner_index()],
    )
    .await
}

fn datasets_name_unique() -> IndexCreateStatement {
    Index::create()
        .name("uq_datasets_name")
        .table(Datasets::Table)
        .col(Datasets::Name)
        .unique()
        .to_owned()
}

fn dataset_tags_name_unique() -> IndexCreateStatement {
    Index::create()
        .name("uq_dataset_tags_name")
        .table(DatasetTags::Table)
        .col(DatasetTags::Name)
        .unique()
        .to_owned()
}

#[derive(DeriveIden)]
enum Datasets {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum DatasetTags {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum DatasetLinks {
    Table,
}
