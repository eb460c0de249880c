//! Règles métier du catalogue: modération, tags, réglages typés

mod common;

use catalogue_backend::error::AppError;
use catalogue_backend::middleware::AuthUser;
use catalogue_backend::models::dto::{DatasetListQuery, SettingRequest, TagRef};
use catalogue_backend::models::moderation::{
    Moderated, ModerationAction, ModerationFilter, ModerationStatus,
};
use catalogue_backend::models::settings::{SettingDataType, SettingValue};
use catalogue_backend::models::{dataset_tags, datasets, settings};
use catalogue_backend::services::dataset_service::DatasetService;
use catalogue_backend::services::moderation_service::ModerationService;
use catalogue_backend::services::setting_service::SettingService;
use catalogue_backend::services::tag_service::TagService;
use chrono::Utc;
use common::{database::*, fixtures::*};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
};

fn as_auth(user: &catalogue_backend::models::users::Model) -> AuthUser {
    AuthUser {
        user_id: user.id,
        email: user.email.clone(),
        is_admin: user.is_admin,
    }
}

// ----------------------------------------------------------------------------
// Modération
// ----------------------------------------------------------------------------

#[actix_web::test]
async fn test_transitions_never_set_both_timestamps() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let dataset = create_test_dataset(&db, owner.id, "Water levels")
        .await
        .expect("Failed to create dataset");
    let id = dataset.dataset.id;
    assert_eq!(dataset.moderation, ModerationStatus::Pending);

    for action in [
        ModerationAction::Approve,
        ModerationAction::Deny,
        ModerationAction::Approve,
        ModerationAction::Reset,
    ] {
        ModerationService::transition::<datasets::Entity>(&db, id, action)
            .await
            .expect("Failed to moderate");

        let row = datasets::Entity::find_by_id(id)
            .one(&db)
            .await
            .expect("Failed to load dataset")
            .expect("Dataset exists");
        assert!(!(row.approved_at.is_some() && row.denied_at.is_some()));
        assert!(row.moderation().is_ok());
    }
}

#[actix_web::test]
async fn test_conflicting_pair_is_listed_and_repaired() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let dataset = create_test_dataset(&db, owner.id, "Bike lanes")
        .await
        .expect("Failed to create dataset");

    // Écriture hors API: les deux horodatages renseignés
    let now = Utc::now().fixed_offset();
    let mut active: datasets::ActiveModel = dataset.dataset.into();
    active.approved_at = Set(Some(now));
    active.denied_at = Set(Some(now));
    let broken = active.update(&db).await.expect("Failed to corrupt dataset");
    assert!(broken.moderation().is_err());

    let conflicting = ModerationService::list::<datasets::Entity>(&db, ModerationFilter::Conflicting)
        .await
        .expect("Failed to list");
    assert_eq!(conflicting.len(), 1);

    // Lecture publique: jamais servi comme approuvé
    let visible = DatasetService::get_visible(&db, broken.id, None).await;
    assert!(visible.is_err());

    let status = ModerationService::transition::<datasets::Entity>(&db, broken.id, ModerationAction::Deny)
        .await
        .expect("Failed to repair");
    assert!(matches!(status, ModerationStatus::Denied { .. }));

    let conflicting = ModerationService::list::<datasets::Entity>(&db, ModerationFilter::Conflicting)
        .await
        .expect("Failed to list");
    assert!(conflicting.is_empty());
}

#[actix_web::test]
async fn test_conflicting_row_does_not_hide_the_others() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let admin = create_test_user(&db, "moderator@example.org", true, true)
        .await
        .expect("Failed to create admin");

    create_test_dataset(&db, owner.id, "Good")
        .await
        .expect("Failed to create dataset");
    let bad = create_test_dataset(&db, owner.id, "Bad")
        .await
        .expect("Failed to create dataset");

    let now = Utc::now().fixed_offset();
    let mut active: datasets::ActiveModel = bad.dataset.into();
    active.approved_at = Set(Some(now));
    active.denied_at = Set(Some(now));
    let bad = active.update(&db).await.expect("Failed to corrupt dataset");

    let mine = DatasetService::list_for_owner(&db, owner.id)
        .await
        .expect("A conflicting row must not fail the whole list");
    let names: Vec<&str> = mine.iter().map(|d| d.dataset.name.as_str()).collect();
    assert_eq!(names, vec!["Good"]);

    // Même pour son propriétaire, la fiche reste introuvable
    let owned = DatasetService::get_visible(&db, bad.id, Some(&as_auth(&owner))).await;
    assert!(matches!(owned, Err(AppError::NotFound(_))));

    // Une édition par un admin repart d'une paire saine
    let edited = DatasetService::update(&db, bad.id, &as_auth(&admin), dataset_request("Bad"))
        .await
        .expect("Failed to update as admin");
    assert_eq!(edited.moderation, ModerationStatus::Pending);
}

#[actix_web::test]
async fn test_owner_edit_resets_moderation_but_admin_edit_does_not() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let admin = create_test_user(&db, "moderator@example.org", true, true)
        .await
        .expect("Failed to create admin");
    let stranger = create_test_user(&db, "stranger@example.org", false, true)
        .await
        .expect("Failed to create user");

    let dataset = create_test_dataset(&db, owner.id, "Street lights")
        .await
        .expect("Failed to create dataset");
    let id = dataset.dataset.id;
    ModerationService::transition::<datasets::Entity>(&db, id, ModerationAction::Approve)
        .await
        .expect("Failed to approve");

    let mut request = dataset_request("Street lights");
    request.description = "Edited by an admin".to_string();
    let edited = DatasetService::update(&db, id, &as_auth(&admin), request)
        .await
        .expect("Failed to update as admin");
    assert!(edited.moderation.is_approved());

    let forbidden = DatasetService::update(&db, id, &as_auth(&stranger), dataset_request("Street lights")).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    let mut request = dataset_request("Street lights");
    request.description = "Edited by the owner".to_string();
    let edited = DatasetService::update(&db, id, &as_auth(&owner), request)
        .await
        .expect("Failed to update as owner");
    assert_eq!(edited.moderation, ModerationStatus::Pending);
}

#[actix_web::test]
async fn test_public_list_only_shows_approved_active_datasets() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let mut ids = Vec::new();
    for name in ["Zebra crossings", "Air quality", "Pending one", "Deleted one"] {
        ids.push(
            create_test_dataset(&db, owner.id, name)
                .await
                .expect("Failed to create dataset")
                .dataset
                .id,
        );
    }
    for id in [ids[0], ids[1], ids[3]] {
        ModerationService::transition::<datasets::Entity>(&db, id, ModerationAction::Approve)
            .await
            .expect("Failed to approve");
    }
    DatasetService::soft_delete(&db, ids[3], &as_auth(&owner))
        .await
        .expect("Failed to delete");
    DatasetService::set_homepage_order(&db, ids[0], Some(1))
        .await
        .expect("Failed to set order");

    let query = DatasetListQuery {
        tag: None,
        dataset_type: None,
    };
    let listed = DatasetService::list_public(&db, &query)
        .await
        .expect("Failed to list");
    let names: Vec<&str> = listed.iter().map(|d| d.dataset.name.as_str()).collect();
    // Position d'accueil d'abord, puis ordre alphabétique
    assert_eq!(names, vec!["Zebra crossings", "Air quality"]);
}

// ----------------------------------------------------------------------------
// Tags
// ----------------------------------------------------------------------------

#[actix_web::test]
async fn test_tag_reconciliation_reuses_and_never_trusts_unknown_ids() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let existing = TagService::create(&db, "Environment").await.expect("Failed to create tag");

    let mut request = dataset_request("Rainfall");
    request.tags = vec![
        TagRef { id: None, name: "environment".to_string() },
        TagRef { id: Some(9999), name: "Weather".to_string() },
        TagRef { id: Some(existing.id), name: "ignored when id matches".to_string() },
    ];
    let dataset = DatasetService::create(&db, owner.id, request)
        .await
        .expect("Failed to create dataset");

    let tag_ids: Vec<i32> = dataset.tags.iter().map(|t| t.id).collect();
    assert_eq!(tag_ids.len(), 2);
    assert!(tag_ids.contains(&existing.id));
    assert!(!tag_ids.contains(&9999));

    let weather = dataset_tags::Entity::find()
        .filter(dataset_tags::Column::Name.eq("Weather"))
        .one(&db)
        .await
        .expect("Failed to load tag")
        .expect("Weather tag must have been created");
    assert!(weather.approved_at.is_none() && weather.denied_at.is_none());

    let duplicate = TagService::create(&db, "ENVIRONMENT").await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[actix_web::test]
async fn test_denied_tag_cannot_be_attached_by_name() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");

    let spam = TagService::create(&db, "Spam").await.expect("Failed to create tag");
    ModerationService::transition::<dataset_tags::Entity>(&db, spam.id, ModerationAction::Deny)
        .await
        .expect("Failed to deny tag");

    let mut request = dataset_request("Promotions");
    request.tags = vec![TagRef { id: None, name: "SPAM".to_string() }];
    let by_name = DatasetService::create(&db, owner.id, request).await;
    assert!(matches!(by_name, Err(AppError::BadRequest(_))), "got {:?}", by_name.err());

    let mut request = dataset_request("Promotions");
    request.tags = vec![TagRef { id: Some(spam.id), name: "Spam".to_string() }];
    let by_id = DatasetService::create(&db, owner.id, request).await;
    assert!(matches!(by_id, Err(AppError::BadRequest(_))), "got {:?}", by_id.err());

    assert_eq!(datasets::Entity::find().count(&db).await.expect("Failed to count"), 0);
}

#[actix_web::test]
async fn test_toggle_tag_adds_then_removes() {
    let db = setup_test_database().await.expect("Failed to connect to test database");
    let owner = create_test_user(&db, "owner@example.org", false, true)
        .await
        .expect("Failed to create user");
    let dataset = create_test_dataset(&db, owner.id, "Footfall")
        .await
        .expect("Failed to create dataset");
    let tag = TagService::create(&db, "Retail").await.expect("Failed to create tag");
    let auth = as_auth(&owner);

    let first = DatasetService::toggle_tag(&db, dataset.dataset.id, tag.id, &auth)
        .await
        .expect("Failed to toggle");
    assert!(first.attached);

    let second = DatasetService::toggle_tag(&db, dataset.dataset.id, tag.id, &auth)
        .await
        .expect("Failed to toggle");
    assert!(!second.attached);

    let missing = DatasetService::toggle_tag(&db, dataset.dataset.id, 9999, &auth).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[actix_web::test]
async fn test_public_tags_are_approved_and_ordered() {
    let db = setup_test_database().await.expect("Failed to connect to test database");

    let second = TagService::create(&db, "Second").await.expect("Failed to create tag");
    let first = TagService::create(&db, "First").await.expect("Failed to create tag");
    TagService::create(&db, "Unreviewed").await.expect("Failed to create tag");

    for (tag, order) in [(&second, 2), (&first, 1)] {
        ModerationService::transition::<dataset_tags::Entity>(&db, tag.id, ModerationAction::Approve)
            .await
            .expect("Failed to approve tag");
        let mut active: dataset_tags::ActiveModel = dataset_tags::Entity::find_by_id(tag.id)
            .one(&db)
            .await
            .expect("Failed to load tag")
            .expect("Tag exists")
            .into();
        active.order_in_navbar = Set(Some(order));
        active.update(&db).await.expect("Failed to order tag");
    }

    let listed = TagService::list_approved(&db).await.expect("Failed to list tags");
    let names: Vec<&str> = listed.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

// ----------------------------------------------------------------------------
// Réglages
// ----------------------------------------------------------------------------

#[actix_web::test]
async fn test_settings_are_validated_before_writing() {
    let db = setup_test_database().await.expect("Failed to connect to test database");

    let invalid = SettingService::upsert(
        &db,
        "homepage_limit",
        SettingRequest {
            data_type: SettingDataType::Number,
            value: "twelve".to_string(),
        },
    )
    .await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));
    assert_eq!(settings::Entity::find().count(&db).await.expect("Failed to count"), 0);

    let saved = SettingService::upsert(
        &db,
        "homepage_limit",
        SettingRequest {
            data_type: SettingDataType::Number,
            value: "12".to_string(),
        },
    )
    .await
    .expect("Failed to save setting");
    assert_eq!(saved.value, SettingValue::Number(12.0));

    // Même clé: remplacement, pas de doublon
    SettingService::upsert(
        &db,
        "homepage_limit",
        SettingRequest {
            data_type: SettingDataType::Boolean,
            value: "true".to_string(),
        },
    )
    .await
    .expect("Failed to replace setting");
    assert_eq!(settings::Entity::find().count(&db).await.expect("Failed to count"), 1);

    let fetched = SettingService::get(&db, "homepage_limit").await.expect("Failed to get setting");
    assert_eq!(fetched.value, SettingValue::Boolean(true));

    // La clé est normalisée de la même façon en lecture, écriture et suppression
    let padded = SettingService::get(&db, " homepage_limit ").await.expect("Failed to get setting");
    assert_eq!(padded.key, "homepage_limit");

    SettingService::delete(&db, " homepage_limit").await.expect("Failed to delete");
    let gone = SettingService::get(&db, "homepage_limit").await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}
