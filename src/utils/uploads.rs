// Fichiers uploadés (images des carrousels).
// En base on ne stocke qu'un nom de fichier relatif à UPLOAD_DIR; tout nom
// venant d'un client passe par `resolve` avant de toucher au disque.

use std::fs;
use std::path::{Component, Path, PathBuf};

use actix_web::web;
use uuid::Uuid;

use crate::config::AppConfig;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid file name '{0}'")]
    InvalidName(String),
    #[error("unsupported file type '{0}'")]
    UnsupportedExtension(String),
    #[error("file exceeds the {0} bytes limit")]
    TooLarge(usize),
    #[error("upload storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    base_dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(base_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.max_upload_bytes)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Chemin absolu d'un fichier uploadé. Refuse les chemins absolus, `..`
    /// et les séparateurs: un nom est toujours un seul composant.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, UploadError> {
        validate_file_name(file_name)?;
        Ok(self.base_dir.join(file_name))
    }

    /// Enregistre le contenu sous un nom généré (uuid + extension d'origine)
    /// et retourne ce nom.
    pub async fn store(&self, original_name: &str, data: Vec<u8>) -> Result<String, UploadError> {
        if data.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        let extension = allowed_extension(original_name)
            .ok_or_else(|| UploadError::UnsupportedExtension(original_name.to_string()))?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.resolve(&file_name)?;
        let base_dir = self.base_dir.clone();

        log::info!("Storing upload {:?} as {:?}", original_name, path);
        web::block(move || {
            fs::create_dir_all(&base_dir)?;
            fs::write(&path, data)
        })
        .await
        .map_err(|e| UploadError::Io(std::io::Error::other(e)))??;

        Ok(file_name)
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!("/uploads/{}", file_name)
    }
}

pub fn validate_file_name(file_name: &str) -> Result<(), UploadError> {
    let invalid = || UploadError::InvalidName(file_name.to_string());

    if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
        return Err(invalid());
    }

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}

fn allowed_extension(original_name: &str) -> Option<&'static str> {
    let extension = Path::new(original_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .find(|allowed| **allowed == extension)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = UploadStore::new("/srv/uploads", 1024);
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("a/b.png").is_err());
        assert!(store.resolve("a\\b.png").is_err());
        assert!(store.resolve("..").is_err());
        assert!(store.resolve(".").is_err());
        assert!(store.resolve("").is_err());
        assert_eq!(
            store.resolve("photo.png").unwrap(),
            PathBuf::from("/srv/uploads/photo.png")
        );
    }

    #[test]
    fn test_extension_whitelist() {
        assert_eq!(allowed_extension("Map.PNG"), Some("png"));
        assert_eq!(allowed_extension("shell.php"), None);
        // Un SVG servi tel quel peut embarquer du script
        assert_eq!(allowed_extension("logo.svg"), None);
        assert_eq!(allowed_extension("noextension"), None);
    }

    #[actix_web::test]
    async fn test_store_writes_under_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);

        let name = store.store("river.jpg", b"fake image".to_vec()).await.unwrap();

        assert!(name.ends_with(".jpg"));
        assert_ne!(name, "river.jpg");
        assert!(store.resolve(&name).unwrap().is_file());
        assert_eq!(store.public_url(&name), format!("/uploads/{}", name));
    }

    #[actix_web::test]
    async fn test_store_refuses_svg() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);

        let result = store.store("logo.SVG", b"<svg onload=\"alert(1)\"/>".to_vec()).await;
        assert!(matches!(result, Err(UploadError::UnsupportedExtension(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_store_enforces_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 4);

        let result = store.store("big.png", vec![0u8; 5]).await;
        assert!(matches!(result, Err(UploadError::TooLarge(4))));
    }
}
