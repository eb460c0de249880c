use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::dto::{RegisterRequest, UserSummary};
use crate::models::lifecycle::SoftDeletable;
use crate::models::users::{self, UserType};
use crate::utils::password;

pub struct UserService;

impl UserService {
    /// Inscription: compte non-admin, non activé (un admin doit l'activer)
    pub async fn register(db: &DatabaseConnection, request: RegisterRequest) -> Result<users::Model, AppError> {
        let email = normalize_email(&request.email);

        // 1. Vérifier si l'utilisateur existe déjà
        if Self::find_by_email(db, &email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // 2. Hash le mot de passe
        let password_hash = password::hash_password(&request.password)?;

        // 3. Créer l'utilisateur
        let now = Utc::now().fixed_offset();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            name: Set(request.name.trim().to_string()),
            company: Set(request.company),
            user_type: Set(request.user_type.unwrap_or(UserType::None)),
            password: Set(password_hash),
            is_admin: Set(false),
            is_activated: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(db)
        .await?;

        log::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Vérifie les identifiants. Un compte non activé est refusé (403)
    /// même avec le bon mot de passe.
    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        plain_password: &str,
    ) -> Result<users::Model, AppError> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = Self::find_by_email(db, &normalize_email(email))
            .await?
            .filter(|u| u.lifecycle().is_active())
            .ok_or_else(invalid)?;

        if !password::verify_password(plain_password, &user.password)? {
            return Err(invalid());
        }
        if !user.is_activated {
            return Err(AppError::Forbidden("Account is not activated yet".to_string()));
        }

        Ok(user)
    }

    pub async fn change_password(
        db: &DatabaseConnection,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = Self::find_active(db, user_id).await?;

        if !password::verify_password(current_password, &user.password)? {
            return Err(AppError::Unauthorized("Current password is incorrect".to_string()));
        }

        let mut active: users::ActiveModel = user.into();
        active.password = Set(password::hash_password(new_password)?);
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(db).await?;
        Ok(())
    }

    pub async fn find_active(db: &DatabaseConnection, user_id: Uuid) -> Result<users::Model, AppError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .filter(|u| u.lifecycle().is_active())
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<UserSummary>, AppError> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|u| UserSummary {
                lifecycle: u.lifecycle(),
                id: u.id,
                email: u.email,
                name: u.name,
                is_admin: u.is_admin,
                is_activated: u.is_activated,
            })
            .collect())
    }

    pub async fn activate(db: &DatabaseConnection, user_id: Uuid) -> Result<users::Model, AppError> {
        let user = Self::find_active(db, user_id).await?;
        if user.is_activated {
            return Ok(user);
        }

        let mut active: users::ActiveModel = user.into();
        active.is_activated = Set(true);
        active.updated_at = Set(Utc::now().fixed_offset());
        let user = active.update(db).await?;

        log::info!("Activated user {}", user.id);
        Ok(user)
    }

    /// Suppression physique: datasets, showcases, demandes d'accès et leurs
    /// enfants partent en cascade
    pub async fn purge(db: &DatabaseConnection, user_id: Uuid) -> Result<(), AppError> {
        let result = users::Entity::delete_by_id(user_id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User"));
        }

        log::warn!("Purged user {} and everything they own", user_id);
        Ok(())
    }

    async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
