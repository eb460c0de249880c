use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(access_requests_table(AccessRequests::Table, true))
            .await?;

        for index in access_request_indexes() {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessRequests::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// Définition de `access_requests`, paramétrée par la nullabilité de
/// `department` (reprise par la reconstruction SQLite de l'étape suivante).
pub(crate) fn access_requests_table<T: IntoIden + Clone + 'static>(
    table: T,
    department_required: bool,
) -> TableCreateStatement {
    let mut department = ColumnDef::new(AccessRequests::Department);
    department.string();
    if department_required {
        department.not_null();
    }

    Table::create()
        .table(table.clone())
        .col(ColumnDef::new(AccessRequests::Id).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(AccessRequests::DatasetId).integer().not_null())
        .col(ColumnDef::new(AccessRequests::UserId).uuid().not_null())
        .col(department)
        .col(ColumnDef::new(AccessRequests::Reason).text())
        .col(
            ColumnDef::new(AccessRequests::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(AccessRequests::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(AccessRequests::DeletedAt).timestamp_with_time_zone())
        .foreign_key(
            ForeignKey::create()
                .name("fk_access_requests_dataset_id")
                .from(table.clone(), AccessRequests::DatasetId)
                .to(Datasets::Table, Datasets::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_access_requests_user_id")
                .from(table, AccessRequests::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub(crate) const ACCESS_REQUEST_COLUMN_NAMES: &[&str] = &[
    "id",
    "dataset_id",
    "user_id",
    "department",
    "reason",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub(crate) fn access_request_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_access_requests_dataset_id")
            .table(AccessRequests::Table)
            .col(AccessRequests::DatasetId)
            .to_owned(),
        Index::create()
            .name("idx_access_requests_user_id")
            .table(AccessRequests::Table)
            .col(AccessRequests::UserId)
            .to_owned(),
    ]
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

#[derive(DeriveIden, Clone)]
enum AccessRequests {
    Table,
    Id,
    DatasetId,
    UserId,
    Department,
    Reason,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
