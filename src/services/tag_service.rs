use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

use crate::error::AppError;
use crate::models::dataset_tags;
use crate::models::dto::{TagRef, UpdateTagRequest};
use crate::models::moderation::{Moderated, ModerationStatus};

/// Résultat d'un clic sur un tag dans l'éditeur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagToggle {
    Attached,
    Detached,
}

/// Ajoute le tag s'il est absent, le retire s'il est présent.
/// L'ordre des autres tags est conservé.
pub fn toggle(current: &[i32], tag_id: i32) -> (Vec<i32>, TagToggle) {
    if current.contains(&tag_id) {
        let remaining = current.iter().copied().filter(|id| *id != tag_id).collect();
        (remaining, TagToggle::Detached)
    } else {
        let mut extended = current.to_vec();
        extended.push(tag_id);
        (extended, TagToggle::Attached)
    }
}

pub struct TagService;

impl TagService {
    /// Tags approuvés et actifs, dans l'ordre de la barre de navigation
    /// (les tags sans position en dernier, puis par nom)
    pub async fn list_approved(db: &DatabaseConnection) -> Result<Vec<dataset_tags::Model>, AppError> {
        let mut tags: Vec<dataset_tags::Model> = dataset_tags::Entity::find()
            .filter(dataset_tags::Column::DeletedAt.is_null())
            .filter(dataset_tags::Column::ApprovedAt.is_not_null())
            .filter(dataset_tags::Column::DeniedAt.is_null())
            .all(db)
            .await?;

        tags.retain(|t| t.is_published());
        tags.sort_by_key(|t| (t.order_in_navbar.is_none(), t.order_in_navbar, t.name.to_lowercase()));
        Ok(tags)
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        conn: &C,
        name: &str,
    ) -> Result<Option<dataset_tags::Model>, DbErr> {
        dataset_tags::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(dataset_tags::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(conn)
            .await
    }

    /// Crée un tag en attente de modération
    pub async fn create(db: &DatabaseConnection, name: &str) -> Result<dataset_tags::Model, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Tag name cannot be empty".to_string()));
        }
        if Self::find_by_name(db, name).await?.is_some() {
            return Err(AppError::Conflict(format!("Tag '{}' already exists", name)));
        }

        Ok(Self::insert_pending(db, name).await?)
    }

    async fn insert_pending<C: ConnectionTrait>(conn: &C, name: &str) -> Result<dataset_tags::Model, DbErr> {
        let now = Utc::now().fixed_offset();
        let tag = dataset_tags::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        log::info!("Created pending tag {} ({})", tag.id, tag.name);
        Ok(tag)
    }

    /// Résout les tags envoyés par le client en ids existants:
    ///   1. id connu (et tag actif)
    ///   2. sinon nom identique à la casse près
    ///   3. sinon nouveau tag en attente
    /// Un id inconnu n'est jamais réutilisé tel quel.
    pub async fn reconcile<C: ConnectionTrait>(conn: &C, refs: &[TagRef]) -> Result<Vec<i32>, AppError> {
        let mut ids: Vec<i32> = Vec::with_capacity(refs.len());

        for tag_ref in refs {
            let by_id = match tag_ref.id {
                Some(id) => dataset_tags::Entity::find_by_id(id)
                    .filter(dataset_tags::Column::DeletedAt.is_null())
                    .one(conn)
                    .await?,
                None => None,
            };

            let id = match by_id {
                Some(tag) => Self::attachable(&tag)?,
                None => {
                    let name = tag_ref.name.trim();
                    if name.is_empty() {
                        return Err(AppError::Validation("Tag name cannot be empty".to_string()));
                    }
                    match Self::find_by_name(conn, name).await? {
                        Some(tag) if tag.deleted_at.is_some() => {
                            return Err(AppError::BadRequest(format!(
                                "Tag '{}' has been removed",
                                tag.name
                            )));
                        }
                        Some(tag) => Self::attachable(&tag)?,
                        None => Self::insert_pending(conn, name).await?.id,
                    }
                }
            };

            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Ok(ids)
    }

    // Un tag refusé ne revient pas par la porte d'un dataset
    fn attachable(tag: &dataset_tags::Model) -> Result<i32, AppError> {
        match tag.moderation() {
            Ok(ModerationStatus::Denied { .. }) => {
                Err(AppError::BadRequest(format!("Tag '{}' has been denied", tag.name)))
            }
            Ok(_) => Ok(tag.id),
            Err(e) => {
                log::warn!("Tag {} not attachable: {}", tag.id, e);
                Err(AppError::BadRequest(format!("Tag '{}' cannot be used", tag.name)))
            }
        }
    }

    /// Présentation d'un tag (admin)
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        request: UpdateTagRequest,
    ) -> Result<dataset_tags::Model, AppError> {
        let tag = dataset_tags::Entity::find_by_id(id)
            .filter(dataset_tags::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Tag"))?;

        let mut active: dataset_tags::ActiveModel = tag.into();
        active.colour = Set(request.colour);
        active.icon = Set(request.icon);
        active.order_in_navbar = Set(request.order_in_navbar);
        active.updated_at = Set(Utc::now().fixed_offset());

        Ok(active.update(db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_missing_tag() {
        let (tags, outcome) = toggle(&[1, 2], 3);
        assert_eq!(tags, vec![1, 2, 3]);
        assert_eq!(outcome, TagToggle::Attached);
    }

    #[test]
    fn test_toggle_removes_present_tag() {
        let (tags, outcome) = toggle(&[1, 2, 3], 2);
        assert_eq!(tags, vec![1, 3]);
        assert_eq!(outcome, TagToggle::Detached);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let (once, _) = toggle(&[4, 5], 9);
        let (twice, _) = toggle(&once, 9);
        assert_eq!(twice, vec![4, 5]);
    }
}
