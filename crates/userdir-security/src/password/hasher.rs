//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString},
    Argon2, Params,
};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;
use userdir_core::{DirectoryError, DirectoryResult, Interface};

/// Interface for password hashing operations.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password into a PHC string.
    fn hash(&self, password: &str) -> DirectoryResult<String>;
}

/// Password hasher service using Argon2id.
#[derive(Component, Clone)]
#[shaku(interface = PasswordHasherInterface)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a memory cost in MiB.
    ///
    /// Falls back to the default parameters when the cost is out of range.
    #[must_use]
    pub fn with_cost(cost_mib: u32) -> Self {
        let params = Params::new(
            cost_mib.saturating_mul(1024),
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
            None,
        )
        .unwrap_or(Params::DEFAULT);

        Self::with_params(params)
    }

    /// Returns the internal Argon2 instance wrapped in Arc.
    ///
    /// This is used for Shaku component parameter extraction.
    #[must_use]
    pub fn argon2_arc(&self) -> Arc<Argon2<'static>> {
        Arc::clone(&self.argon2)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> DirectoryResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DirectoryError::Internal(format!("Failed to hash password: {e}")))?;

        debug!("Password hashed");
        Ok(hash.to_string())
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1)
    }

    fn matches(password: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).unwrap();
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    }

    #[test]
    fn test_hash_is_argon2id_phc() {
        let hash = fast_hasher().hash("p@ss").unwrap();

        assert!(hash.starts_with("$argon2id$v=19$m=1024,"));
        assert!(matches("p@ss", &hash));
        assert!(!matches("wrong-password", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("secret").unwrap();
        let hash2 = hasher.hash("secret").unwrap();

        assert_ne!(hash1, hash2);
        assert!(matches("secret", &hash1));
        assert!(matches("secret", &hash2));
    }

    #[test]
    fn test_out_of_range_cost_falls_back_to_default() {
        let hash = PasswordHasher::with_cost(0).hash("pw").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        let params = Params::try_from(&parsed).unwrap();

        assert_eq!(params.m_cost(), Params::DEFAULT_M_COST);
    }

    #[test]
    fn test_hasher_default() {
        let hash = PasswordHasher::default().hash("test_password").unwrap();
        assert!(matches("test_password", &hash));
    }

    #[test]
    fn test_hasher_debug_does_not_leak_internals() {
        let debug_str = format!("{:?}", fast_hasher());
        assert_eq!(debug_str, "PasswordHasher { .. }");
    }
}
