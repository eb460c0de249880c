use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{ShowcaseRequest, ShowcaseResponse};
use crate::models::lifecycle::SoftDeletable;
use crate::models::moderation::Moderated;
use crate::models::{datasets, showcase_locations, showcase_slider_images, showcases};
use crate::utils::uploads::validate_file_name;

pub struct ShowcaseService;

impl ShowcaseService {
    /// Showcases approuvés et actifs, par titre
    pub async fn list_public(db: &DatabaseConnection) -> Result<Vec<ShowcaseResponse>, AppError> {
        let found = showcases::Entity::find()
            .filter(showcases::Column::DeletedAt.is_null())
            .filter(showcases::Column::ApprovedAt.is_not_null())
            .filter(showcases::Column::DeniedAt.is_null())
            .order_by_asc(showcases::Column::Title)
            .all(db)
            .await?;

        Self::with_children(db, found).await
    }

    pub async fn get_visible(
        db: &DatabaseConnection,
        id: i32,
        viewer: Option<&AuthUser>,
    ) -> Result<ShowcaseResponse, AppError> {
        let showcase = Self::find_active(db, id).await?;

        if let Err(e) = showcase.moderation() {
            log::warn!("Showcase {} hidden: {}", showcase.id, e);
            return Err(AppError::NotFound("Showcase"));
        }

        let can_manage = viewer.is_some_and(|user| user.can_manage(showcase.user_id));
        if !can_manage && !showcase.is_published() {
            return Err(AppError::NotFound("Showcase"));
        }

        Self::load_response(db, showcase).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: ShowcaseRequest,
    ) -> Result<ShowcaseResponse, AppError> {
        Self::check_request(db, &request).await?;

        let txn = db.begin().await?;
        let now = Utc::now().fixed_offset();

        let showcase = showcases::ActiveModel {
            title: Set(request.title.trim().to_string()),
            description: Set(request.description.clone()),
            youtube_link: Set(request.youtube_link.clone()),
            user_id: Set(owner_id),
            dataset_id: Set(request.dataset_id),
            approved_at: Set(None),
            denied_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        Self::replace_children(&txn, showcase.id, &request).await?;
        let response = Self::load_response(&txn, showcase).await?;
        txn.commit().await?;

        log::info!("Showcase {} created by {}", response.showcase.id, owner_id);
        Ok(response)
    }

    /// Une modification faite par un non-admin repasse le showcase en attente
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        user: &AuthUser,
        request: ShowcaseRequest,
    ) -> Result<ShowcaseResponse, AppError> {
        let showcase = Self::find_active(db, id).await?;
        if !user.can_manage(showcase.user_id) {
            return Err(AppError::Forbidden("Only the owner or an admin can edit this showcase".to_string()));
        }
        Self::check_request(db, &request).await?;
        let conflicting = showcase.moderation().is_err();

        let txn = db.begin().await?;

        let mut active: showcases::ActiveModel = showcase.into();
        active.title = Set(request.title.trim().to_string());
        active.description = Set(request.description.clone());
        active.youtube_link = Set(request.youtube_link.clone());
        active.dataset_id = Set(request.dataset_id);
        active.updated_at = Set(Utc::now().fixed_offset());
        if !user.is_admin || conflicting {
            active.approved_at = Set(None);
            active.denied_at = Set(None);
        }
        let showcase = active.update(&txn).await?;

        Self::replace_children(&txn, showcase.id, &request).await?;
        let response = Self::load_response(&txn, showcase).await?;
        txn.commit().await?;
        Ok(response)
    }

    pub async fn soft_delete(db: &DatabaseConnection, id: i32, user: &AuthUser) -> Result<(), AppError> {
        let showcase = Self::find_active(db, id).await?;
        if !user.can_manage(showcase.user_id) {
            return Err(AppError::Forbidden("Only the owner or an admin can delete this showcase".to_string()));
        }

        let mut active: showcases::ActiveModel = showcase.into();
        active.deleted_at = Set(Some(Utc::now().fixed_offset()));
        active.update(db).await?;
        Ok(())
    }

    async fn find_active(db: &DatabaseConnection, id: i32) -> Result<showcases::Model, AppError> {
        showcases::Entity::find_by_id(id)
            .one(db)
            .await?
            .filter(|s| s.lifecycle().is_active())
            .ok_or(AppError::NotFound("Showcase"))
    }

    /// Le dataset lié doit exister et ne pas être supprimé
    async fn check_request(db: &DatabaseConnection, request: &ShowcaseRequest) -> Result<(), AppError> {
        for file_name in &request.slider_images {
            validate_file_name(file_name)?;
        }

        if let Some(dataset_id) = request.dataset_id {
            let linked = datasets::Entity::find_by_id(dataset_id)
                .filter(datasets::Column::DeletedAt.is_null())
                .one(db)
                .await?;
            if linked.is_none() {
                return Err(AppError::BadRequest(format!("Dataset {} does not exist", dataset_id)));
            }
        }
        Ok(())
    }

    async fn replace_children<C: ConnectionTrait>(
        conn: &C,
        showcase_id: i32,
        request: &ShowcaseRequest,
    ) -> Result<(), DbErr> {
        showcase_locations::Entity::delete_many()
            .filter(showcase_locations::Column::ShowcaseId.eq(showcase_id))
            .exec(conn)
            .await?;
        showcase_slider_images::Entity::delete_many()
            .filter(showcase_slider_images::Column::ShowcaseId.eq(showcase_id))
            .exec(conn)
            .await?;

        for location in &request.locations {
            showcase_locations::ActiveModel {
                showcase_id: Set(showcase_id),
                name: Set(location.name.clone()),
                latitude: Set(location.latitude),
                longitude: Set(location.longitude),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }

        for (position, file_name) in request.slider_images.iter().enumerate() {
            showcase_slider_images::ActiveModel {
                showcase_id: Set(showcase_id),
                file_name: Set(file_name.clone()),
                position: Set(position as i32),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }

    async fn load_response<C: ConnectionTrait>(
        conn: &C,
        showcase: showcases::Model,
    ) -> Result<ShowcaseResponse, AppError> {
        let mut responses = Self::with_children(conn, vec![showcase]).await?;
        responses.pop().ok_or_else(|| AppError::Internal("showcase vanished while loading".to_string()))
    }

    async fn with_children<C: ConnectionTrait>(
        conn: &C,
        found: Vec<showcases::Model>,
    ) -> Result<Vec<ShowcaseResponse>, AppError> {
        if found.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = found.iter().map(|s| s.id).collect();

        let mut locations: HashMap<i32, Vec<showcase_locations::Model>> = HashMap::new();
        for location in showcase_locations::Entity::find()
            .filter(showcase_locations::Column::ShowcaseId.is_in(ids.clone()))
            .order_by_asc(showcase_locations::Column::Id)
            .all(conn)
            .await?
        {
            locations.entry(location.showcase_id).or_default().push(location);
        }

        let mut images: HashMap<i32, Vec<showcase_slider_images::Model>> = HashMap::new();
        for image in showcase_slider_images::Entity::find()
            .filter(showcase_slider_images::Column::ShowcaseId.is_in(ids))
            .order_by_asc(showcase_slider_images::Column::Position)
            .all(conn)
            .await?
        {
            images.entry(image.showcase_id).or_default().push(image);
        }

        let mut responses = Vec::with_capacity(found.len());
        for showcase in found {
            let moderation = match showcase.moderation() {
                Ok(moderation) => moderation,
                Err(e) => {
                    log::warn!("Skipping showcase {}: {}", showcase.id, e);
                    continue;
                }
            };
            responses.push(ShowcaseResponse {
                moderation,
                lifecycle: showcase.lifecycle(),
                locations: locations.remove(&showcase.id).unwrap_or_default(),
                slider_images: images.remove(&showcase.id).unwrap_or_default(),
                showcase,
            });
        }
        Ok(responses)
    }
}
