use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{DatasetListQuery, DatasetRequest, DatasetResponse, TagToggleResponse};
use crate::models::lifecycle::SoftDeletable;
use crate::models::moderation::Moderated;
use crate::models::{
    dataset_links, dataset_locations, dataset_slider_images, dataset_tags, dataset_tags_datasets,
    datasets,
};
use crate::services::tag_service::{self, TagService, TagToggle};
use crate::utils::uploads::validate_file_name;

pub struct DatasetService;

impl DatasetService {
    /// Datasets publics: approuvés, non supprimés, filtrés par tag et/ou type.
    /// Tri: order_in_homepage (les datasets sans position en dernier), puis nom.
    pub async fn list_public(
        db: &DatabaseConnection,
        query: &DatasetListQuery,
    ) -> Result<Vec<DatasetResponse>, AppError> {
        let mut select = datasets::Entity::find()
            .filter(datasets::Column::DeletedAt.is_null())
            .filter(datasets::Column::ApprovedAt.is_not_null())
            .filter(datasets::Column::DeniedAt.is_null());

        if let Some(dataset_type) = query.dataset_type {
            select = select.filter(datasets::Column::DatasetType.eq(dataset_type));
        }
        if let Some(tag_id) = query.tag {
            select = select.filter(
                datasets::Column::Id.in_subquery(
                    Query::select()
                        .column(dataset_tags_datasets::Column::DatasetId)
                        .from(dataset_tags_datasets::Entity)
                        .and_where(dataset_tags_datasets::Column::DatasetTagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }

        let mut found = select.all(db).await?;
        found.sort_by_key(|d| (d.order_in_homepage.is_none(), d.order_in_homepage, d.name.to_lowercase()));

        Self::with_children(db, found).await
    }

    /// Un dataset est visible s'il est actif et approuvé, ou si le lecteur
    /// en est le propriétaire ou un admin
    pub async fn get_visible(
        db: &DatabaseConnection,
        id: i32,
        viewer: Option<&AuthUser>,
    ) -> Result<DatasetResponse, AppError> {
        let dataset = Self::find_active(db, id).await?;

        if let Err(e) = dataset.moderation() {
            log::warn!("Dataset {} hidden: {}", dataset.id, e);
            return Err(AppError::NotFound("Dataset"));
        }

        let can_manage = viewer.is_some_and(|user| user.can_manage(dataset.user_id));
        if !can_manage && !dataset.is_published() {
            return Err(AppError::NotFound("Dataset"));
        }

        Self::load_response(db, dataset).await
    }

    pub async fn list_for_owner(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<DatasetResponse>, AppError> {
        let found = datasets::Entity::find()
            .filter(datasets::Column::UserId.eq(user_id))
            .filter(datasets::Column::DeletedAt.is_null())
            .order_by_desc(datasets::Column::CreatedAt)
            .all(db)
            .await?;

        Self::with_children(db, found).await
    }

    /// Crée un dataset (en attente de modération) avec ses enfants et ses tags,
    /// dans une seule transaction
    pub async fn create(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: DatasetRequest,
    ) -> Result<DatasetResponse, AppError> {
        Self::check_file_names(&request.slider_images)?;

        let txn = db.begin().await?;
        let now = Utc::now().fixed_offset();

        let dataset = datasets::ActiveModel {
            name: Set(request.name.trim().to_string()),
            dataset_type: Set(request.dataset_type),
            description: Set(request.description.clone()),
            update_frequency: Set(request.update_frequency),
            update_frequency_unit: Set(request.update_frequency_unit),
            mqtt_address: Set(request.mqtt_address.clone()),
            mqtt_port: Set(request.mqtt_port),
            mqtt_topic: Set(request.mqtt_topic.clone()),
            mqtt_username: Set(request.mqtt_username.clone()),
            mqtt_password: Set(request.mqtt_password.clone()),
            user_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            approved_at: Set(None),
            denied_at: Set(None),
            order_in_homepage: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        Self::replace_children(&txn, dataset.id, &request).await?;
        let tag_ids = TagService::reconcile(&txn, &request.tags).await?;
        Self::replace_tags(&txn, dataset.id, &tag_ids).await?;

        let response = Self::load_response(&txn, dataset).await?;
        txn.commit().await?;

        log::info!("Dataset {} created by {}", response.dataset.id, owner_id);
        Ok(response)
    }

    /// Remplace le contenu d'un dataset. Une modification faite par un
    /// non-admin repasse le dataset en attente de modération.
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        user: &AuthUser,
        request: DatasetRequest,
    ) -> Result<DatasetResponse, AppError> {
        Self::check_file_names(&request.slider_images)?;

        let dataset = Self::find_active(db, id).await?;
        if !user.can_manage(dataset.user_id) {
            return Err(AppError::Forbidden("Only the owner or an admin can edit this dataset".to_string()));
        }
        let conflicting = dataset.moderation().is_err();

        let txn = db.begin().await?;

        let mut active: datasets::ActiveModel = dataset.into();
        active.name = Set(request.name.trim().to_string());
        active.dataset_type = Set(request.dataset_type);
        active.description = Set(request.description.clone());
        active.update_frequency = Set(request.update_frequency);
        active.update_frequency_unit = Set(request.update_frequency_unit);
        active.mqtt_address = Set(request.mqtt_address.clone());
        active.mqtt_port = Set(request.mqtt_port);
        active.mqtt_topic = Set(request.mqtt_topic.clone());
        active.mqtt_username = Set(request.mqtt_username.clone());
        active.mqtt_password = Set(request.mqtt_password.clone());
        active.updated_at = Set(Utc::now().fixed_offset());
        // Paire invalide: même un admin repart de l'état en attente
        if !user.is_admin || conflicting {
            active.approved_at = Set(None);
            active.denied_at = Set(None);
        }
        let dataset = active.update(&txn).await?;

        Self::replace_children(&txn, dataset.id, &request).await?;
        let tag_ids = TagService::reconcile(&txn, &request.tags).await?;
        Self::replace_tags(&txn, dataset.id, &tag_ids).await?;

        let response = Self::load_response(&txn, dataset).await?;
        txn.commit().await?;
        Ok(response)
    }

    /// Suppression logique: les enfants restent en base
    pub async fn soft_delete(db: &DatabaseConnection, id: i32, user: &AuthUser) -> Result<(), AppError> {
        let dataset = Self::find_active(db, id).await?;
        if !user.can_manage(dataset.user_id) {
            return Err(AppError::Forbidden("Only the owner or an admin can delete this dataset".to_string()));
        }

        let mut active: datasets::ActiveModel = dataset.into();
        active.deleted_at = Set(Some(Utc::now().fixed_offset()));
        active.update(db).await?;

        log::info!("Dataset {} soft-deleted by {}", id, user.user_id);
        Ok(())
    }

    pub async fn toggle_tag(
        db: &DatabaseConnection,
        id: i32,
        tag_id: i32,
        user: &AuthUser,
    ) -> Result<TagToggleResponse, AppError> {
        let dataset = Self::find_active(db, id).await?;
        if !user.can_manage(dataset.user_id) {
            return Err(AppError::Forbidden("Only the owner or an admin can edit this dataset".to_string()));
        }

        dataset_tags::Entity::find_by_id(tag_id)
            .filter(dataset_tags::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Tag"))?;

        let txn = db.begin().await?;
        let current = Self::tag_ids(&txn, id).await?;
        let (next, outcome) = tag_service::toggle(&current, tag_id);
        Self::replace_tags(&txn, id, &next).await?;
        txn.commit().await?;

        Ok(TagToggleResponse {
            dataset_id: id,
            tag_id,
            attached: outcome == TagToggle::Attached,
        })
    }

    pub async fn set_homepage_order(
        db: &DatabaseConnection,
        id: i32,
        order: Option<i32>,
    ) -> Result<datasets::Model, AppError> {
        let dataset = Self::find_active(db, id).await?;

        let mut active: datasets::ActiveModel = dataset.into();
        active.order_in_homepage = Set(order);
        active.updated_at = Set(Utc::now().fixed_offset());
        Ok(active.update(db).await?)
    }

    pub async fn find_active(db: &DatabaseConnection, id: i32) -> Result<datasets::Model, AppError> {
        let dataset = datasets::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Dataset"))?;

        if !dataset.lifecycle().is_active() {
            return Err(AppError::NotFound("Dataset"));
        }
        Ok(dataset)
    }

    fn check_file_names(file_names: &[String]) -> Result<(), AppError> {
        for file_name in file_names {
            validate_file_name(file_name)?;
        }
        Ok(())
    }

    async fn replace_children<C: ConnectionTrait>(
        conn: &C,
        dataset_id: i32,
        request: &DatasetRequest,
    ) -> Result<(), DbErr> {
        dataset_links::Entity::delete_many()
            .filter(dataset_links::Column::DatasetId.eq(dataset_id))
            .exec(conn)
            .await?;
        dataset_locations::Entity::delete_many()
            .filter(dataset_locations::Column::DatasetId.eq(dataset_id))
            .exec(conn)
            .await?;
        dataset_slider_images::Entity::delete_many()
            .filter(dataset_slider_images::Column::DatasetId.eq(dataset_id))
            .exec(conn)
            .await?;

        for link in &request.links {
            dataset_links::ActiveModel {
                dataset_id: Set(dataset_id),
                name: Set(link.name.clone()),
                url: Set(link.url.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }

        for location in &request.locations {
            dataset_locations::ActiveModel {
                dataset_id: Set(dataset_id),
                name: Set(location.name.clone()),
                latitude: Set(location.latitude),
                longitude: Set(location.longitude),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }

        for (position, file_name) in request.slider_images.iter().enumerate() {
            dataset_slider_images::ActiveModel {
                dataset_id: Set(dataset_id),
                file_name: Set(file_name.clone()),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }

        Ok(())
    }

    async fn tag_ids<C: ConnectionTrait>(conn: &C, dataset_id: i32) -> Result<Vec<i32>, DbErr> {
        Ok(dataset_tags_datasets::Entity::find()
            .filter(dataset_tags_datasets::Column::DatasetId.eq(dataset_id))
            .order_by_asc(dataset_tags_datasets::Column::DatasetTagId)
            .all(conn)
            .await?
            .into_iter()
            .map(|row| row.dataset_tag_id)
            .collect())
    }

    async fn replace_tags<C: ConnectionTrait>(conn: &C, dataset_id: i32, tag_ids: &[i32]) -> Result<(), DbErr> {
        dataset_tags_datasets::Entity::delete_many()
            .filter(dataset_tags_datasets::Column::DatasetId.eq(dataset_id))
            .exec(conn)
            .await?;

        for tag_id in tag_ids {
            dataset_tags_datasets::ActiveModel {
                dataset_id: Set(dataset_id),
                dataset_tag_id: Set(*tag_id),
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }

    async fn load_response<C: ConnectionTrait>(
        conn: &C,
        dataset: datasets::Model,
    ) -> Result<DatasetResponse, AppError> {
        let mut responses = Self::with_children(conn, vec![dataset]).await?;
        responses.pop().ok_or_else(|| AppError::Internal("dataset vanished while loading".to_string()))
    }

    /// Charge les enfants et les tags de plusieurs datasets en une requête par table
    async fn with_children<C: ConnectionTrait>(
        conn: &C,
        found: Vec<datasets::Model>,
    ) -> Result<Vec<DatasetResponse>, AppError> {
        if found.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = found.iter().map(|d| d.id).collect();

        let mut links: HashMap<i32, Vec<dataset_links::Model>> = HashMap::new();
        for link in dataset_links::Entity::find()
            .filter(dataset_links::Column::DatasetId.is_in(ids.clone()))
            .order_by_asc(dataset_links::Column::Id)
            .all(conn)
            .await?
        {
            links.entry(link.dataset_id).or_default().push(link);
        }

        let mut locations: HashMap<i32, Vec<dataset_locations::Model>> = HashMap::new();
        for location in dataset_locations::Entity::find()
            .filter(dataset_locations::Column::DatasetId.is_in(ids.clone()))
            .order_by_asc(dataset_locations::Column::Id)
            .all(conn)
            .await?
        {
            locations.entry(location.dataset_id).or_default().push(location);
        }

        let mut images: HashMap<i32, Vec<dataset_slider_images::Model>> = HashMap::new();
        for image in dataset_slider_images::Entity::find()
            .filter(dataset_slider_images::Column::DatasetId.is_in(ids.clone()))
            .order_by_asc(dataset_slider_images::Column::Position)
            .all(conn)
            .await?
        {
            images.entry(image.dataset_id).or_default().push(image);
        }

        let joins = dataset_tags_datasets::Entity::find()
            .filter(dataset_tags_datasets::Column::DatasetId.is_in(ids))
            .all(conn)
            .await?;
        let tag_ids: Vec<i32> = joins.iter().map(|j| j.dataset_tag_id).collect();
        let tags_by_id: HashMap<i32, dataset_tags::Model> = dataset_tags::Entity::find()
            .filter(dataset_tags::Column::Id.is_in(tag_ids))
            .filter(dataset_tags::Column::DeletedAt.is_null())
            .all(conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let mut tags: HashMap<i32, Vec<dataset_tags::Model>> = HashMap::new();
        for join in joins {
            if let Some(tag) = tags_by_id.get(&join.dataset_tag_id) {
                tags.entry(join.dataset_id).or_default().push(tag.clone());
            }
        }

        let mut responses = Vec::with_capacity(found.len());
        for dataset in found {
            let moderation = match dataset.moderation() {
                Ok(moderation) => moderation,
                Err(e) => {
                    log::warn!("Skipping dataset {}: {}", dataset.id, e);
                    continue;
                }
            };
            let lifecycle = dataset.lifecycle();
            let mut attached = tags.remove(&dataset.id).unwrap_or_default();
            attached.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            responses.push(DatasetResponse {
                moderation,
                lifecycle,
                links: links.remove(&dataset.id).unwrap_or_default(),
                locations: locations.remove(&dataset.id).unwrap_or_default(),
                slider_images: images.remove(&dataset.id).unwrap_or_default(),
                tags: attached,
                dataset,
            });
        }
        Ok(responses)
    }
}
