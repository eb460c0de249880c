use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // user_id
    pub email: String,
    pub is_admin: bool,
    pub exp: i64,        // expiration timestamp
}

/// Clé et durée de validité des tokens, partagées via web::Data
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    ttl_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.jwt_ttl_hours)
    }

    /// Génère un JWT token pour un utilisateur
    pub fn generate_token(&self, user_id: Uuid, email: &str, is_admin: bool) -> Result<String, String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(self.ttl_hours))
            .ok_or("Failed to calculate expiration")?
            .timestamp();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            is_admin,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
            .map_err(|e| format!("Failed to generate token: {}", e))
    }

    /// Vérifie et décode un JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let jwt = JwtConfig::new("test-secret", 1);
        let user_id = Uuid::new_v4();

        let token = jwt.generate_token(user_id, "ada@example.org", true).unwrap();
        let claims = jwt.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.org");
        assert!(claims.is_admin);
    }

    #[test]
    fn test_invalid_token() {
        let jwt = JwtConfig::new("test-secret", 1);
        let result = jwt.verify_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_token_signed_with_another_secret_is_rejected() {
        let token = JwtConfig::new("one", 1)
            .generate_token(Uuid::new_v4(), "a@b.c", false)
            .unwrap();
        assert!(JwtConfig::new("two", 1).verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // La validation par défaut tolère 60s de décalage
        let jwt = JwtConfig::new("test-secret", -1);
        let token = jwt.generate_token(Uuid::new_v4(), "a@b.c", false).unwrap();
        assert!(jwt.verify_token(&token).is_err());
    }
}
