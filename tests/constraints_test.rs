//! Intégrité des données: unicité, cascades, écritures tout-ou-rien

mod common;

use catalogue_backend::error::AppError;
use catalogue_backend::models::dto::{AccessRequestRequest, ShowcaseRequest, TagRef};
use catalogue_backend::models::{
    access_requests, dataset_links, dataset_tags, datasets, showcases,
};
use catalogue_backend::services::access_request_service::AccessRequestService;
use catalogue_backend::services::dataset_service::DatasetService;
use catalogue_backend::services::showcase_service::ShowcaseService;
use catalogue_backend::services::tag_service::TagService;
use catalogue_backend::services::user_service::UserService;
use chrono::Utc;
use common::{database::*, fixtures::*};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, PaginatorTrait,
};

async fn count<E>(db: &DatabaseConnection) -> u64
where
    E: EntityTrait,
    E::Model: Sync,
{
    E::find().count(db).await.expect("Failed to count rows")
}

fn showcase_request(title: &str, dataset_id: Option<i32>) -> ShowcaseRequest {
    ShowcaseRequest {
        title: title.to_string(),
        description: "How the data is used".to_string(),
        youtube_link: None,
        dataset_id,
        locations: vec![],
        slider_images: vec![],
    }
}

#[actix_web::test]
async fn test_duplicate_dataset_name_is_a_conflict() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    create_test_dataset(&db, owner.id, "Air quality")
        .await
        .expect("Failed to create dataset");
    let datasets_before = count::<datasets::Entity>(&db).await;
    let links_before = count::<dataset_links::Entity>(&db).await;

    let result = create_test_dataset(&db, owner.id, "Air quality").await;
    assert!(matches!(result, Err(AppError::Conflict(_))), "got {:?}", result.err());

    assert_eq!(count::<datasets::Entity>(&db).await, datasets_before);
    assert_eq!(count::<dataset_links::Entity>(&db).await, links_before);
}

#[actix_web::test]
async fn test_failed_tag_resolution_rolls_back_dataset() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let removed = TagService::create(&db, "Retired").await.expect("Failed to create tag");
    let mut active: dataset_tags::ActiveModel = removed.into();
    active.deleted_at = Set(Some(Utc::now().fixed_offset()));
    active.update(&db).await.expect("Failed to soft-delete tag");

    // Le dataset et ses liens sont insérés avant la résolution des tags:
    // l'échec doit tout annuler
    let mut request = dataset_request("Noise levels");
    request.tags = vec![TagRef {
        id: None,
        name: "retired".to_string(),
    }];
    let result = DatasetService::create(&db, owner.id, request).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))), "got {:?}", result.err());

    assert_eq!(count::<datasets::Entity>(&db).await, 0);
    assert_eq!(count::<dataset_links::Entity>(&db).await, 0);
}

#[actix_web::test]
async fn test_user_purge_cascades_to_owned_rows() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let dataset = create_test_dataset(&db, owner.id, "Traffic counts")
        .await
        .expect("Failed to create dataset");
    ShowcaseService::create(&db, owner.id, showcase_request("Traffic map", Some(dataset.dataset.id)))
        .await
        .expect("Failed to create showcase");

    let now = Utc::now().fixed_offset();
    access_requests::ActiveModel {
        dataset_id: Set(dataset.dataset.id),
        user_id: Set(owner.id),
        department: Set(Some("Research".to_string())),
        reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to insert access request");

    UserService::purge(&db, owner.id).await.expect("Failed to purge user");

    assert_eq!(count::<datasets::Entity>(&db).await, 0);
    assert_eq!(count::<dataset_links::Entity>(&db).await, 0);
    assert_eq!(count::<showcases::Entity>(&db).await, 0);
    assert_eq!(count::<access_requests::Entity>(&db).await, 0);

    let again = UserService::purge(&db, owner.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[actix_web::test]
async fn test_dataset_delete_detaches_showcase() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let dataset = create_test_dataset(&db, owner.id, "Parking")
        .await
        .expect("Failed to create dataset");
    let showcase =
        ShowcaseService::create(&db, owner.id, showcase_request("Parking app", Some(dataset.dataset.id)))
            .await
            .expect("Failed to create showcase");

    datasets::Entity::delete_by_id(dataset.dataset.id)
        .exec(&db)
        .await
        .expect("Failed to delete dataset");

    let kept = showcases::Entity::find_by_id(showcase.showcase.id)
        .one(&db)
        .await
        .expect("Failed to load showcase")
        .expect("Showcase must survive its dataset");
    assert_eq!(kept.dataset_id, None);
}

#[actix_web::test]
async fn test_showcase_rejects_missing_dataset() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let result = ShowcaseService::create(&db, owner.id, showcase_request("Ghost", Some(4242))).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(count::<showcases::Entity>(&db).await, 0);
}

#[actix_web::test]
async fn test_access_request_needs_approved_controlled_dataset() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let dataset = create_test_dataset(&db, owner.id, "Energy use")
        .await
        .expect("Failed to create dataset");

    let request = || AccessRequestRequest {
        department: Some("  ".to_string()),
        reason: Some("Thesis".to_string()),
    };

    // En attente: invisible
    let pending = AccessRequestService::create(&db, dataset.dataset.id, owner.id, request()).await;
    assert!(matches!(pending, Err(AppError::NotFound(_))));

    let now = Utc::now().fixed_offset();
    let mut active: datasets::ActiveModel = dataset.dataset.clone().into();
    active.approved_at = Set(Some(now));
    let approved = active.update(&db).await.expect("Failed to approve dataset");

    // Ouvert: pas de demande nécessaire
    let open = AccessRequestService::create(&db, approved.id, owner.id, request()).await;
    assert!(matches!(open, Err(AppError::BadRequest(_))));

    let mut active: datasets::ActiveModel = approved.into();
    active.dataset_type = Set(datasets::DatasetType::Controlled);
    let controlled = active.update(&db).await.expect("Failed to update dataset");

    let created = AccessRequestService::create(&db, controlled.id, owner.id, request())
        .await
        .expect("Failed to create access request");
    assert_eq!(created.department, None);

    let mine = AccessRequestService::list_for_user(&db, owner.id)
        .await
        .expect("Failed to list access requests");
    assert_eq!(mine.len(), 1);
}
