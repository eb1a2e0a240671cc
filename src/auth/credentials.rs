use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Trimmed, lowercased email if it looks like an address.
pub fn normalize_email(raw: &str) -> Option<String> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    let email = raw.trim().to_lowercase();
    EMAIL_RE.is_match(&email).then_some(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

/// False on mismatch; errors only when `stored` is not a PHC hash string.
pub fn password_matches(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| anyhow::anyhow!("malformed stored hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_matches_only_its_password() {
        let hash = hash_password("Secur3P@ssw0rd!").unwrap();
        assert!(password_matches("Secur3P@ssw0rd!", &hash).unwrap());
        assert!(!password_matches("wrong-password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(password_matches("anything", "not-a-valid-hash").is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(
            normalize_email("  Ann@Example.COM ").as_deref(),
            Some("ann@example.com")
        );
        assert_eq!(normalize_email("ann@example"), None);
        assert_eq!(normalize_email("ann example@x.io"), None);
    }
}
