// Configuration de l'application, lue une seule fois au démarrage
// depuis l'environnement (le .env est chargé par main.rs via dotenv).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_JWT_SECRET: &str = "default-insecure-key-change-this";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_address: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// Répertoire de base des fichiers uploadés (les `file_name` y sont relatifs)
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not found in .env, using default (INSECURE)");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080)?,
            jwt_secret,
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", 24)?,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            run_migrations: parse_or("RUN_MIGRATIONS", true)?,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_defaults_when_unset() {
        let value: u16 = parse_or("CATALOGUE_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }
}
