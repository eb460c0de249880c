use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtConfig;

/// POST /auth/register - Créer un compte (PUBLIC)
/// Le compte reste inactif tant qu'un admin ne l'a pas activé: pas de token ici
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = UserService::register(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// POST /auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    jwt: web::Data<JwtConfig>,
) -> Result<HttpResponse, AppError> {
    // 1. Vérifier les identifiants (et l'activation du compte)
    let user = UserService::authenticate(db.get_ref(), &body.email, &body.password).await?;

    // 2. Générer le JWT
    let token = jwt
        .generate_token(user.id, &user.email, user.is_admin)
        .map_err(AppError::Internal)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}

/// GET /auth/me - Infos de l'utilisateur connecté (PROTÉGÉ)
#[get("/me")]
pub async fn me(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::find_active(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /auth/change-password (PROTÉGÉ)
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    UserService::change_password(
        db.get_ref(),
        auth_user.user_id,
        &body.current_password,
        &body.new_password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me)
            .service(change_password)
    );
}
