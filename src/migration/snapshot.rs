// Photographie du schéma: tables, colonnes, index, contraintes et types enum.
// Deux photographies prises sur le même backend se comparent avec `==`, ce qui
// permet de vérifier qu'un `down` défait exactement son `up`.

use std::collections::BTreeMap;

use sea_orm::{ConnectionTrait, DbBackend, DbErr, QueryResult, Statement};

const LEDGER_TABLE: &str = "seaql_migrations";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSnapshot {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Dans l'ordre physique de la table
    pub columns: Vec<ColumnSnapshot>,
    /// Nom de l'index → définition
    pub indexes: BTreeMap<String, String>,
    /// Clé primaire et clés étrangères, triées
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub tables: BTreeMap<String, TableSnapshot>,
    /// Types enum Postgres (toujours vide sur SQLite)
    pub enums: BTreeMap<String, Vec<String>>,
}

impl SchemaSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.enums.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.get(name)
    }
}

impl TableSnapshot {
    pub fn column(&self, name: &str) -> Option<&ColumnSnapshot> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub async fn capture<C: ConnectionTrait>(db: &C) -> Result<SchemaSnapshot, DbErr> {
    match db.get_database_backend() {
        DbBackend::Sqlite => capture_sqlite(db).await,
        DbBackend::Postgres => capture_postgres(db).await,
        DbBackend::MySql => Err(DbErr::Custom(
            "schema snapshots are not supported on MySQL".to_string(),
        )),
    }
}

async fn query<C: ConnectionTrait>(db: &C, sql: String) -> Result<Vec<QueryResult>, DbErr> {
    db.query_all(Statement::from_string(db.get_database_backend(), sql))
        .await
}

async fn capture_sqlite<C: ConnectionTrait>(db: &C) -> Result<SchemaSnapshot, DbErr> {
    let mut snapshot = SchemaSnapshot::default();

    let tables = query(
        db,
        format!(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' AND name <> '{}'",
            LEDGER_TABLE
        ),
    )
    .await?;

    for row in tables {
        let table: String = row.try_get("", "name")?;
        let mut table_snapshot = TableSnapshot::default();
        let mut primary_key: Vec<(i32, String)> = Vec::new();

        let columns = query(
            db,
            format!(
                r#"SELECT name, "type" AS data_type, "notnull" AS not_null, dflt_value, pk
                   FROM pragma_table_info('{}') ORDER BY cid"#,
                table
            ),
        )
        .await?;
        for column in columns {
            let name: String = column.try_get("", "name")?;
            let pk: i32 = column.try_get("", "pk")?;
            if pk > 0 {
                primary_key.push((pk, name.clone()));
            }
            table_snapshot.columns.push(ColumnSnapshot {
                name,
                data_type: column.try_get("", "data_type")?,
                nullable: column.try_get::<i32>("", "not_null")? == 0,
                default: column.try_get("", "dflt_value")?,
            });
        }

        if !primary_key.is_empty() {
            primary_key.sort();
            let columns: Vec<String> = primary_key.into_iter().map(|(_, name)| name).collect();
            table_snapshot
                .constraints
                .push(format!("PRIMARY KEY ({})", columns.join(", ")));
        }

        // Seuls les index explicites: les index automatiques de SQLite
        // suivent la clé primaire déjà capturée
        let indexes = query(
            db,
            format!(
                r#"SELECT name, "unique" AS is_unique FROM pragma_index_list('{}') WHERE origin = 'c'"#,
                table
            ),
        )
        .await?;
        for index in indexes {
            let name: String = index.try_get("", "name")?;
            let unique: i32 = index.try_get("", "is_unique")?;
            let columns = query(
                db,
                format!("SELECT name FROM pragma_index_info('{}') ORDER BY seqno", name),
            )
            .await?
            .into_iter()
            .map(|c| c.try_get::<String>("", "name"))
            .collect::<Result<Vec<_>, _>>()?;

            let definition = format!(
                "{}({})",
                if unique != 0 { "UNIQUE " } else { "" },
                columns.join(", ")
            );
            table_snapshot.indexes.insert(name, definition);
        }

        let foreign_keys = query(
            db,
            format!(
                r#"SELECT "table" AS target, "from" AS source, "to" AS target_column, on_delete
                   FROM pragma_foreign_key_list('{}')"#,
                table
            ),
        )
        .await?;
        for fk in foreign_keys {
            let source: String = fk.try_get("", "source")?;
            let target: String = fk.try_get("", "target")?;
            let target_column: String = fk.try_get("", "target_column")?;
            let on_delete: String = fk.try_get("", "on_delete")?;
            table_snapshot.constraints.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
                source, target, target_column, on_delete
            ));
        }

        table_snapshot.constraints.sort();
        snapshot.tables.insert(table, table_snapshot);
    }

    Ok(snapshot)
}

async fn capture_postgres<C: ConnectionTrait>(db: &C) -> Result<SchemaSnapshot, DbErr> {
    let mut snapshot = SchemaSnapshot::default();

    let tables = query(
        db,
        format!(
            "SELECT table_name::text AS name FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
             AND table_name <> '{}'",
            LEDGER_TABLE
        ),
    )
    .await?;

    for row in tables {
        let table: String = row.try_get("", "name")?;
        let mut table_snapshot = TableSnapshot::default();

        let columns = query(
            db,
            format!(
                "SELECT column_name::text AS name, \
                 CASE WHEN data_type = 'USER-DEFINED' THEN udt_name::text ELSE data_type::text END AS data_type, \
                 (is_nullable = 'YES') AS nullable, \
                 column_default::text AS default_value \
                 FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = '{}' \
                 ORDER BY ordinal_position",
                table
            ),
        )
        .await?;
        for column in columns {
            table_snapshot.columns.push(ColumnSnapshot {
                name: column.try_get("", "name")?,
                data_type: column.try_get("", "data_type")?,
                nullable: column.try_get("", "nullable")?,
                default: column.try_get("", "default_value")?,
            });
        }

        let indexes = query(
            db,
            format!(
                "SELECT indexname::text AS name, indexdef::text AS definition FROM pg_indexes \
                 WHERE schemaname = current_schema() AND tablename = '{}'",
                table
            ),
        )
        .await?;
        for index in indexes {
            table_snapshot
                .indexes
                .insert(index.try_get("", "name")?, index.try_get("", "definition")?);
        }

        let constraints = query(
            db,
            format!(
                "SELECT conname::text AS name, pg_get_constraintdef(c.oid)::text AS definition \
                 FROM pg_constraint c JOIN pg_class t ON t.oid = c.conrelid \
                 JOIN pg_namespace n ON n.oid = t.relnamespace \
                 WHERE n.nspname = current_schema() AND t.relname = '{}'",
                table
            ),
        )
        .await?;
        for constraint in constraints {
            let name: String = constraint.try_get("", "name")?;
            let definition: String = constraint.try_get("", "definition")?;
            table_snapshot
                .constraints
                .push(format!("{}: {}", name, definition));
        }

        table_snapshot.constraints.sort();
        snapshot.tables.insert(table, table_snapshot);
    }

    let labels = query(
        db,
        "SELECT t.typname::text AS name, e.enumlabel::text AS label FROM pg_type t \
         JOIN pg_enum e ON e.enumtypid = t.oid \
         JOIN pg_namespace n ON n.oid = t.typnamespace \
         WHERE n.nspname = current_schema() \
         ORDER BY t.typname, e.enumsortorder"
            .to_string(),
    )
    .await?;
    for row in labels {
        let name: String = row.try_get("", "name")?;
        let label: String = row.try_get("", "label")?;
        snapshot.enums.entry(name).or_default().push(label);
    }

    Ok(snapshot)
}
