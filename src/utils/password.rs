use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD}};

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid hash format: {0}")]
    InvalidFormat(&'static str),
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("failed to decode hash: {0}")]
    Decode(String),
    #[error("PBKDF2 failed: {0}")]
    Pbkdf2(String),
}

/// Hash un mot de passe au format Werkzeug
/// Utilise PBKDF2-HMAC-SHA256 avec 260000 itérations et un salt de 16 bytes
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    // Générer un salt aléatoire de 16 bytes
    let mut salt = [0u8; 16];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, ITERATIONS, &mut key)
        .map_err(|e| PasswordError::Pbkdf2(e.to_string()))?;

    // Encoder en base64 URL-safe sans padding (format Werkzeug moderne)
    let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
    let hash_b64 = URL_SAFE_NO_PAD.encode(key);

    // Format: pbkdf2:sha256:iterations$salt$hash
    Ok(format!("pbkdf2:sha256:{}${}${}", ITERATIONS, salt_b64, hash_b64))
}

/// Vérifie un mot de passe contre un hash Werkzeug
/// Supporte les formats: base64 (nouveau) et hex (ancien)
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    // Parser le format: pbkdf2:sha256:iterations$salt$hash
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 3 {
        return Err(PasswordError::InvalidFormat("expected method$salt$hash"));
    }

    let header_parts: Vec<&str> = parts[0].split(':').collect();
    if header_parts.len() != 3 {
        return Err(PasswordError::InvalidFormat("expected pbkdf2:sha256:iterations"));
    }
    if header_parts[0] != "pbkdf2" || header_parts[1] != "sha256" {
        return Err(PasswordError::UnsupportedAlgorithm(parts[0].to_string()));
    }

    let iterations = header_parts[2]
        .parse::<u32>()
        .map_err(|_| PasswordError::InvalidFormat("iterations is not a number"))?;

    let salt = decode_flexible(parts[1])?;
    let expected_hash = decode_flexible(parts[2])?;

    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| PasswordError::Pbkdf2(e.to_string()))?;

    Ok(constant_time_eq(&computed, &expected_hash))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Décode une chaîne encodée en base64 ou hexadécimal
fn decode_flexible(input: &str) -> Result<Vec<u8>, PasswordError> {
    // Format hexadécimal (64 caractères = 32 bytes)
    if input.len() == 64 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(input).map_err(|e| PasswordError::Decode(e.to_string()));
    }

    let padded = add_base64_padding(input);

    if let Ok(decoded) = URL_SAFE_NO_PAD.decode(input) {
        return Ok(decoded);
    }
    if let Ok(decoded) = URL_SAFE.decode(&padded) {
        return Ok(decoded);
    }
    if let Ok(decoded) = STANDARD.decode(&padded) {
        return Ok(decoded);
    }
    if let Ok(decoded) = STANDARD_NO_PAD.decode(input) {
        return Ok(decoded);
    }

    // Dernier recours: hexadécimal
    hex::decode(input).map_err(|_| PasswordError::Decode(input.to_string()))
}

/// Ajoute le padding '=' manquant pour base64
fn add_base64_padding(input: &str) -> String {
    let padding_needed = (4 - (input.len() % 4)) % 4;
    format!("{}{}", input, "=".repeat(padding_needed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("pbkdf2:sha256:260000$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_two_hashes_of_same_password_differ() {
        assert_ne!(hash_password("secret").unwrap(), hash_password("secret").unwrap());
    }

    #[test]
    fn test_legacy_hex_hash_is_accepted() {
        // Hash hexadécimal produit par les anciennes versions de Werkzeug
        let salt = "c2FsdHNhbHQ";
        let mut key = [0u8; KEY_LENGTH];
        pbkdf2::<HmacSha256>(b"legacy", &URL_SAFE_NO_PAD.decode(salt).unwrap(), 1000, &mut key)
            .unwrap();
        let stored = format!("pbkdf2:sha256:1000${}${}", salt, hex::encode(key));

        assert!(verify_password("legacy", &stored).unwrap());
    }

    #[test]
    fn test_malformed_hashes_are_errors() {
        assert!(verify_password("x", "plaintext").is_err());
        assert!(verify_password("x", "md5:1$a$b").is_err());
        assert!(verify_password("x", "scrypt:32768:8:1$salt$hash").is_err());
    }
}
