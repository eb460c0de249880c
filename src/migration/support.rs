// Outils partagés par les migrations.
//
// Postgres est la cible de production: types enum natifs, ALTER COLUMN.
// SQLite (dev / tests) n'a ni l'un ni l'autre: les enums deviennent des
// colonnes texte et les changements de nullabilité passent par une
// reconstruction de table.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend, Statement};
use sea_orm_migration::sea_query::extension::postgres::Type;

pub(crate) fn is_postgres(manager: &SchemaManager<'_>) -> bool {
    manager.get_database_backend() == DbBackend::Postgres
}

/// Colonne typée par un enum Postgres (texte sur les autres backends).
pub(crate) fn enum_column<T: IntoIden>(manager: &SchemaManager<'_>, column: T, type_name: &str) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    if is_postgres(manager) {
        def.custom(Alias::new(type_name));
    } else {
        def.string_len(32);
    }
    def
}

pub(crate) async fn create_enum(
    manager: &SchemaManager<'_>,
    type_name: &str,
    variants: &[&str],
) -> Result<(), DbErr> {
    if !is_postgres(manager) {
        return Ok(());
    }

    manager
        .create_type(
            Type::create()
                .as_enum(Alias::new(type_name))
                .values(variants.iter().map(|v| Alias::new(*v)))
                .to_owned(),
        )
        .await
}

pub(crate) async fn drop_enum(manager: &SchemaManager<'_>, type_name: &str) -> Result<(), DbErr> {
    if !is_postgres(manager) {
        return Ok(());
    }

    manager
        .drop_type(Type::drop().if_exists().name(Alias::new(type_name)).to_owned())
        .await
}

pub(crate) async fn execute_sql(manager: &SchemaManager<'_>, sql: &str) -> Result<(), DbErr> {
    manager.get_connection().execute_unprepared(sql).await?;
    Ok(())
}

/// Exécute une requête de la forme `SELECT COUNT(*) AS count ...`.
pub(crate) async fn count_rows(manager: &SchemaManager<'_>, sql: &str) -> Result<i64, DbErr> {
    let row = manager
        .get_connection()
        .query_one(Statement::from_string(manager.get_database_backend(), sql.to_owned()))
        .await?;

    match row {
        Some(row) => row.try_get("", "count"),
        None => Ok(0),
    }
}

/// Garde d'une étape de resserrement: refuse de continuer si des lignes
/// violeraient la nouvelle contrainte. Rien n'a encore été modifié à ce stade.
pub(crate) async fn ensure_no_violations(
    manager: &SchemaManager<'_>,
    count_sql: &str,
    constraint: &str,
) -> Result<(), DbErr> {
    let violations = count_rows(manager, count_sql).await?;
    if violations > 0 {
        return Err(DbErr::Migration(format!(
            "cannot apply {}: {} existing row(s) would violate it",
            constraint, violations
        )));
    }
    Ok(())
}

pub(crate) async fn set_column_nullable_postgres(
    manager: &SchemaManager<'_>,
    table: &str,
    column: &str,
    nullable: bool,
) -> Result<(), DbErr> {
    let action = if nullable { "DROP" } else { "SET" };
    execute_sql(
        manager,
        &format!(r#"ALTER TABLE "{}" ALTER COLUMN "{}" {} NOT NULL"#, table, column, action),
    )
    .await
}

/// Reconstruction SQLite d'une table (procédure "12 étapes" de la doc SQLite):
/// clés étrangères coupées, nouvelle table, copie, drop, rename, index, check.
///
/// `define` reçoit le nom de la table temporaire; `columns` liste les colonnes
/// copiées (identiques des deux côtés).
pub(crate) async fn rebuild_sqlite_table<F>(
    manager: &SchemaManager<'_>,
    table: &str,
    columns: &[&str],
    define: F,
    indexes: Vec<IndexCreateStatement>,
) -> Result<(), DbErr>
where
    F: FnOnce(Alias) -> TableCreateStatement,
{
    execute_sql(manager, "PRAGMA foreign_keys = OFF").await?;
    let outcome = copy_into_rebuilt_table(manager, table, columns, define, indexes).await;
    execute_sql(manager, "PRAGMA foreign_keys = ON").await?;
    outcome
}

async fn copy_into_rebuilt_table<F>(
    manager: &SchemaManager<'_>,
    table: &str,
    columns: &[&str],
    define: F,
    indexes: Vec<IndexCreateStatement>,
) -> Result<(), DbErr>
where
    F: FnOnce(Alias) -> TableCreateStatement,
{
    let rebuilt = format!("{}__rebuild", table);
    manager.create_table(define(Alias::new(&rebuilt))).await?;

    let column_list = columns
        .iter()
        .map(|c| format!(r#""{}""#, c))
        .collect::<Vec<_>>()
        .join(", ");
    execute_sql(
        manager,
        &format!(
            r#"INSERT INTO "{}" ({}) SELECT {} FROM "{}""#,
            rebuilt, column_list, column_list, table
        ),
    )
    .await?;

    manager
        .drop_table(Table::drop().table(Alias::new(table)).to_owned())
        .await?;
    manager
        .rename_table(
            Table::rename()
                .table(Alias::new(&rebuilt), Alias::new(table))
                .to_owned(),
        )
        .await?;

    for index in indexes {
        manager.create_index(index).await?;
    }

    let broken = manager
        .get_connection()
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            "PRAGMA foreign_key_check".to_owned(),
        ))
        .await?;
    if !broken.is_empty() {
        return Err(DbErr::Migration(format!(
            "rebuilding {} left {} dangling foreign key(s)",
            table,
            broken.len()
        )));
    }

    Ok(())
}
