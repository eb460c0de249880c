use sea_orm_migration::prelude::*;

use super::m20230904_101500_create_users::{USER_TYPE_ENUM, USER_TYPES_V1};
use super::support::{execute_sql, is_postgres};

pub(crate) const USER_TYPES_V2: &[&str] = &[
    "none",
    "government",
    "business",
    "academic",
    "non_profit",
    "individual",
];

// Correspondances explicites entre les deux versions de l'enum. Toute valeur
// absente de la table tombe sur la valeur de repli.
const FORWARD: &[(&str, &str)] = &[
    ("public_sector", "government"),
    ("private_sector", "business"),
    ("academia", "academic"),
];
const FORWARD_FALLBACK: &str = "none";

const BACKWARD: &[(&str, &str)] = &[
    ("government", "public_sector"),
    ("business", "private_sector"),
    ("academic", "academia"),
];
const BACKWARD_FALLBACK: &str = "other";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        retype_users(manager, USER_TYPES_V2, FORWARD, FORWARD_FALLBACK).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        retype_users(manager, USER_TYPES_V1, BACKWARD, BACKWARD_FALLBACK).await
    }
}

/// Remplace les valeurs de `users.type` par un nouvel ensemble.
///
/// Postgres: renommer l'ancien type, passer la colonne en texte, créer le
/// nouveau type, remapper les lignes, recaster, supprimer l'ancien type.
/// Ailleurs la colonne est déjà du texte: seul le remappage s'applique.
async fn retype_users(
    manager: &SchemaManager<'_>,
    variants: &[&str],
    mapping: &[(&str, &str)],
    fallback: &str,
) -> Result<(), DbErr> {
    let remap = remap_statement(mapping, fallback);

    if !is_postgres(manager) {
        return execute_sql(manager, &remap).await;
    }

    let old_type = format!("{}_old", USER_TYPE_ENUM);
    let values = variants
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ");

    let steps = [
        format!(r#"ALTER TYPE "{}" RENAME TO "{}""#, USER_TYPE_ENUM, old_type),
        r#"ALTER TABLE "users" ALTER COLUMN "type" TYPE text"#.to_string(),
        format!(r#"CREATE TYPE "{}" AS ENUM ({})"#, USER_TYPE_ENUM, values),
        remap,
        format!(
            r#"ALTER TABLE "users" ALTER COLUMN "type" TYPE "{0}" USING "type"::"{0}""#,
            USER_TYPE_ENUM
        ),
        format!(r#"DROP TYPE "{}""#, old_type),
    ];

    for sql in steps {
        execute_sql(manager, &sql).await?;
    }

    Ok(())
}

fn remap_statement(mapping: &[(&str, &str)], fallback: &str) -> String {
    let arms = mapping
        .iter()
        .map(|(from, to)| format!("WHEN '{}' THEN '{}'", from, to))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"UPDATE "users" SET "type" = CASE "type" {} ELSE '{}' END"#,
        arms, fallback
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mapping_targets_a_declared_variant() {
        for (from, to) in FORWARD {
            assert!(USER_TYPES_V1.contains(from));
            assert!(USER_TYPES_V2.contains(to));
        }
        for (from, to) in BACKWARD {
            assert!(USER_TYPES_V2.contains(from));
            assert!(USER_TYPES_V1.contains(to));
        }
        assert!(USER_TYPES_V2.contains(&FORWARD_FALLBACK));
        assert!(USER_TYPES_V1.contains(&BACKWARD_FALLBACK));
    }

    #[test]
    fn test_remap_statement_ends_with_fallback() {
        let sql = remap_statement(FORWARD, FORWARD_FALLBACK);
        assert!(sql.contains("WHEN 'academia' THEN 'academic'"));
        assert!(sql.ends_with("ELSE 'none' END"));
    }
}
