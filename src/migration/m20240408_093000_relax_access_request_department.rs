use sea_orm_migration::prelude::*;

use super::m20240312_150000_create_access_requests::{
    ACCESS_REQUEST_COLUMN_NAMES, access_request_indexes, access_requests_table,
};
use super::support::{
    ensure_no_violations, is_postgres, rebuild_sqlite_table, set_column_nullable_postgres,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        set_department_required(manager, false).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Aucune valeur inventée: une demande sans département bloque le retour arrière
        ensure_no_violations(
            manager,
            r#"SELECT COUNT(*) AS count FROM "access_requests" WHERE "department" IS NULL"#,
            "NOT NULL on access_requests.department",
        )
        .await?;

        set_department_required(manager, true).await
    }
}

async fn set_department_required(manager: &SchemaManager<'_>, required: bool) -> Result<(), DbErr> {
    if is_postgres(manager) {
        return set_column_nullable_postgres(manager, "access_requests", "department", !required)
            .await;
    }

    rebuild_sqlite_table(
        manager,
        "access_requests",
        ACCESS_REQUEST_COLUMN_NAMES,
        |table| access_requests_table(table, required),
        access_request_indexes(),
    )
    .await
}
