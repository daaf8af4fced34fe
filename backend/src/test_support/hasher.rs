//! Cheap password hasher double.
//!
//! Argon2 is slow; handler and BDD suites hash and verify many passwords, so
//! they use this reversible stand-in instead.

use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const PREFIX: &str = "plain$";

/// Stores passwords as `plain$<password>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextPasswordHasher;

#[async_trait]
impl PasswordHasher for PlaintextPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("{PREFIX}{password}")))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let stored = hash
            .as_str()
            .strip_prefix(PREFIX)
            .ok_or_else(|| PasswordHasherError::malformed_hash("missing plain$ prefix"))?;
        Ok(stored == password)
    }
}
