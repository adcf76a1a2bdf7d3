//! Password verification against stored Argon2 hashes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

/// Check a plaintext password against a stored hash.
///
/// A malformed or unparseable stored hash counts as a failed verification,
/// never an error. Comparison timing is delegated to the Argon2 verifier.
#[must_use]
pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
pub(crate) fn hash(plaintext: &str) -> anyhow::Result<String> {
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_password() -> anyhow::Result<()> {
        let stored = hash("password123")?;
        assert!(verify("password123", &stored));
        Ok(())
    }

    #[test]
    fn rejects_wrong_password() -> anyhow::Result<()> {
        let stored = hash("password123")?;
        assert!(!verify("password124", &stored));
        assert!(!verify("", &stored));
        Ok(())
    }

    #[test]
    fn malformed_hash_fails_instead_of_erroring() {
        assert!(!verify("password123", ""));
        assert!(!verify("password123", "not-a-phc-string"));
        assert!(!verify("password123", "$argon2id$v=19$broken"));
    }
}
