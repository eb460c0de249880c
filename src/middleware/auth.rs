use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::jwt::JwtConfig;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

/// Utilisateur authentifié ET administrateur (403 sinon)
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl AuthUser {
    /// Propriétaire de la ressource ou admin
    pub fn can_manage(&self, owner_id: Uuid) -> bool {
        self.is_admin || self.user_id == owner_id
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        let jwt = req
            .app_data::<web::Data<JwtConfig>>()
            .ok_or_else(|| AppError::Internal("JWT configuration is not registered".to_string()))?;

        // 1. Extraire le header Authorization
        let auth_str = req
            .headers()
            .get("Authorization")
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

        // 2. Extraire le token (format: "Bearer <token>")
        let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized(
                "Invalid Authorization format (expected: Bearer <token>)".to_string(),
            )
        })?;

        // 3. Vérifier le token JWT
        let claims = jwt.verify_token(token).map_err(AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            is_admin: claims.is_admin,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(AuthUser::from_http_request(req).map_err(Into::into))
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = AuthUser::from_http_request(req).and_then(|user| {
            if user.is_admin {
                Ok(AdminUser(user))
            } else {
                Err(AppError::Forbidden("Admin privileges required".to_string()))
            }
        });
        ready(result.map_err(Into::into))
    }
}
