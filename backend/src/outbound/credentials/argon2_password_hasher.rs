//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashing is memory-hard and slow, so every call runs on Tokio's blocking
//! pool instead of an Actix worker thread.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};
use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

const SALT_LEN: usize = 16;
const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Cost parameters for Argon2id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    /// The argon2 crate's recommended defaults.
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id password hasher holding a precomputed decoy hash.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
    decoy_hash: String,
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, PasswordHashError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let salt =
        SaltString::encode_b64(&salt).map_err(|err| PasswordHashError::hash(err.to_string()))?;
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

fn verify_with(argon2: &Argon2<'_>, password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("stored password hash is malformed");
        return false;
    };
    argon2.verify_password(password.as_bytes(), &parsed).is_ok()
}

impl Argon2PasswordHasher {
    /// Build a hasher and compute its decoy hash.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError::Hash` when `params` are out of range.
    pub fn new(params: HashingParams) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_hash = hash_with(&argon2, DECOY_PASSWORD)?;
        Ok(Self { argon2, decoy_hash })
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let argon2 = self.argon2.clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash_with(&argon2, &password))
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }

    async fn verify(&self, password: &str, hash: &str) -> bool {
        let argon2 = self.argon2.clone();
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_with(&argon2, &password, &hash))
            .await
            .unwrap_or(false)
    }

    async fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy_hash).await;
    }
}
