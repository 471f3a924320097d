use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;

use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::PasswordConfig;

/// Longest accepted password, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password exceeds {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
    #[error("invalid argon2 parameters: {0}")]
    Params(String),
    #[error("argon2 hashing failed: {0}")]
    Hash(String),
}

/// Argon2id hasher bound to the configured work factor.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Digest of a random secret at the same cost, checked when no account
    /// matches so both login paths do one full verify.
    dummy: Arc<str>,
}

impl PasswordHasher {
    pub fn new(cfg: PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let secret = SaltString::generate(&mut OsRng);
        let dummy = argon2
            .hash_password(secret.as_str().as_bytes(), &SaltString::generate(&mut OsRng))
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .to_string();
        Ok(Self {
            argon2,
            dummy: dummy.into(),
        })
    }

    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        if plain.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                PasswordError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Never errors: a wrong password, an over-long input and a corrupt digest
    /// are all just `false`. The digest carries its own parameters.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        if plain.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        let parsed = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "argon2 parse hash error");
                return false;
            }
        };
        self.argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spends the same work as [`verify`](Self::verify) for a login whose
    /// account does not exist. Always `false`.
    pub fn verify_absent(&self, plain: &str) -> bool {
        let _ = self.verify(plain, &self.dummy);
        false
    }
}
