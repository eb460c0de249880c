//! Ledger des migrations: chaque étape se défait exactement, et les étapes
//! de resserrement refusent de tourner sur des données non conformes

mod common;

use catalogue_backend::migration::snapshot;
use catalogue_backend::migration::Migrator;
use catalogue_backend::models::{access_requests, datasets, users};
use chrono::Utc;
use common::{database::*, fixtures::*};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, PaginatorTrait, QueryFilter, Statement,
};
use sea_orm_migration::MigratorTrait;

const ORPHAN_DATASET_SQL: &str = r#"INSERT INTO "datasets" ("name", "dataset_type", "description")
    VALUES ('Orphan', 'open', 'No owner')"#;

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), sea_orm::DbErr> {
    db.execute(Statement::from_string(DbBackend::Sqlite, sql.to_owned()))
        .await
        .map(|_| ())
}

async fn applied_count(db: &DatabaseConnection) -> usize {
    Migrator::get_applied_migrations(db)
        .await
        .expect("Failed to read the migration ledger")
        .len()
}

#[actix_web::test]
async fn test_each_step_round_trips() {
    let db = empty_test_database().await.expect("Failed to connect to test database");
    let total = Migrator::migrations().len();

    for step in 0..total {
        let before = snapshot::capture(&db).await.expect("Failed to capture schema");

        Migrator::up(&db, Some(1)).await.expect("Failed to apply step");
        let applied = snapshot::capture(&db).await.expect("Failed to capture schema");

        // Défaire puis refaire: le schéma doit revenir à l'identique
        Migrator::down(&db, Some(1)).await.expect("Failed to revert step");
        let reverted = snapshot::capture(&db).await.expect("Failed to capture schema");
        assert_eq!(before, reverted, "step {} is not reverted exactly", step + 1);

        Migrator::up(&db, Some(1)).await.expect("Failed to re-apply step");
        let reapplied = snapshot::capture(&db).await.expect("Failed to capture schema");
        assert_eq!(applied, reapplied, "step {} is not replayable", step + 1);
    }

    assert_eq!(applied_count(&db).await, total);
}

#[actix_web::test]
async fn test_full_up_then_down_leaves_empty_schema() {
    let db = setup_test_database().await.expect("Failed to connect to test database");

    let migrated = snapshot::capture(&db).await.expect("Failed to capture schema");
    for table in [
        "users",
        "datasets",
        "dataset_links",
        "dataset_locations",
        "dataset_slider_images",
        "dataset_tags",
        "dataset_tags_datasets",
        "showcases",
        "showcase_locations",
        "showcase_slider_images",
        "settings",
        "access_requests",
    ] {
        assert!(migrated.table(table).is_some(), "missing table {}", table);
    }
    assert!(migrated.table("seaql_migrations").is_none());

    Migrator::down(&db, None).await.expect("Failed to revert all steps");
    let reverted = snapshot::capture(&db).await.expect("Failed to capture schema");
    assert!(reverted.is_empty(), "leftover schema: {:?}", reverted);
    assert_eq!(applied_count(&db).await, 0);
}

#[actix_web::test]
async fn test_final_schema_shape() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let schema = snapshot::capture(&db).await.expect("Failed to capture schema");

    let users = schema.table("users").expect("users table");
    assert!(users.column("phone").is_none());
    assert!(users.indexes.contains_key("uq_users_email"));

    let datasets = schema.table("datasets").expect("datasets table");
    assert!(!datasets.column("user_id").expect("user_id").nullable);
    assert!(datasets.column("approved_at").expect("approved_at").nullable);
    assert!(datasets.indexes.contains_key("uq_datasets_name"));

    let links = schema.table("dataset_links").expect("dataset_links table");
    assert!(!links.indexes.contains_key("uq_dataset_links_url"));

    let tags = schema.table("dataset_tags").expect("dataset_tags table");
    assert!(tags.indexes.contains_key("uq_dataset_tags_name"));

    let requests = schema.table("access_requests").expect("access_requests table");
    assert!(requests.column("department").expect("department").nullable);
}

#[actix_web::test]
async fn test_owner_guard_aborts_without_touching_schema() {
    let db = empty_test_database().await.expect("Failed to connect to test database");
    Migrator::up(&db, Some(5)).await.expect("Failed to apply first steps");

    // Pas d'admin à ce stade: le rattrapage ne peut pas lui attribuer de propriétaire
    execute(&db, ORPHAN_DATASET_SQL).await.expect("Failed to insert orphan dataset");
    let before = snapshot::capture(&db).await.expect("Failed to capture schema");

    let result = Migrator::up(&db, Some(1)).await;
    assert!(result.is_err(), "tightening must refuse a NULL owner");

    let after = snapshot::capture(&db).await.expect("Failed to capture schema");
    assert_eq!(before, after);
    assert_eq!(applied_count(&db).await, 5);

    // Une fois le dataset rattaché, l'étape passe
    execute(&db, r#"DELETE FROM "datasets" WHERE "name" = 'Orphan'"#)
        .await
        .expect("Failed to remove orphan");
    Migrator::up(&db, Some(1)).await.expect("Failed to apply tightening step");
    assert_eq!(applied_count(&db).await, 6);
}

#[actix_web::test]
async fn test_null_owner_rejected_after_tightening() {
    let db = empty_test_database().await.expect("Failed to connect to test database");
    Migrator::up(&db, Some(6)).await.expect("Failed to apply first steps");

    let result = execute(&db, ORPHAN_DATASET_SQL).await;
    assert!(result.is_err(), "datasets.user_id must be NOT NULL");
}

#[actix_web::test]
async fn test_department_guard_blocks_revert() {
    let db = setup_test_database().await.expect("Failed to connect to test database");

    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let dataset = create_test_dataset(&db, owner.id, "Air quality")
        .await
        .expect("Failed to create dataset");

    let now = Utc::now().fixed_offset();
    access_requests::ActiveModel {
        dataset_id: Set(dataset.dataset.id),
        user_id: Set(owner.id),
        department: Set(None),
        reason: Set(Some("Research".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to insert access request");

    let before = snapshot::capture(&db).await.expect("Failed to capture schema");
    let result = Migrator::down(&db, Some(1)).await;
    assert!(result.is_err(), "revert must refuse NULL departments");

    let after = snapshot::capture(&db).await.expect("Failed to capture schema");
    assert_eq!(before, after);
    assert_eq!(applied_count(&db).await, Migrator::migrations().len());
}

#[actix_web::test]
async fn test_seed_admin_is_created_once() {
    let db = setup_test_database().await.expect("Failed to connect to test database");

    let admins = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            r#"SELECT COUNT(*) AS count FROM "users" WHERE "is_admin" = TRUE"#.to_owned(),
        ))
        .await
        .expect("Failed to count admins")
        .expect("No row returned")
        .try_get::<i64>("", "count")
        .expect("Failed to read count");
    assert_eq!(admins, 1);
}

#[actix_web::test]
async fn test_seed_admin_revert_keeps_owned_datasets() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let total = Migrator::migrations().len();

    let admin = users::Entity::find()
        .filter(users::Column::IsAdmin.eq(true))
        .one(&db)
        .await
        .expect("Failed to load admin")
        .expect("Seeded admin exists");
    create_test_dataset(&db, admin.id, "Admin dataset")
        .await
        .expect("Failed to create dataset");

    // Étapes 11 à 8 se défont, l'étape 7 refuse
    let result = Migrator::down(&db, Some(5)).await;
    assert!(result.is_err(), "revert must refuse while the admin owns datasets");

    assert_eq!(applied_count(&db).await, total - 4);
    assert_eq!(datasets::Entity::find().count(&db).await.expect("Failed to count"), 1);
    let still_there = users::Entity::find_by_id(admin.id)
        .one(&db)
        .await
        .expect("Failed to load admin");
    assert!(still_there.is_some());
}
