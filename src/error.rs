// Erreur commune aux services et aux routes.
// Chaque variante correspond à un statut HTTP; la réponse est toujours
// {"error": "..."} comme dans le reste de l'API.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};

use crate::models::moderation::InvalidModerationState;
use crate::models::settings::SettingValueError;
use crate::utils::password::PasswordError;
use crate::utils::uploads::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Upload exceeds the {0} bytes limit")]
    PayloadTooLarge(usize),
    #[error("Database error: {0}")]
    Database(DbErr),
    #[error("{0}")]
    Internal(String),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        // Les violations de contraintes remontent de la BD: on rejette toute
        // l'écriture avec un statut client plutôt qu'un 500
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                AppError::Conflict(format!("Unique constraint violated: {}", detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                AppError::BadRequest(format!("Foreign key constraint violated: {}", detail))
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<SettingValueError> for AppError {
    fn from(err: SettingValueError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<InvalidModerationState> for AppError {
    fn from(err: InvalidModerationState) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::TooLarge(limit) => AppError::PayloadTooLarge(limit),
            UploadError::Io(e) => AppError::Internal(format!("Upload storage error: {}", e)),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_found_is_a_server_side_database_error() {
        let err: AppError = DbErr::RecordNotFound("datasets".to_string()).into();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound("Dataset");
        assert_eq!(err.to_string(), "Dataset not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
