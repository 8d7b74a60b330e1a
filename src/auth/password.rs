//! Password hashing and verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::{AuthPolicy, DEFAULT_MIN_PASSWORD_LENGTH};
use crate::error::{EngineError, EngineResult};

/// A stored password: the PHC hash string and the salt it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    /// PHC-format hash, salt included.
    pub hash: String,
    /// The salt on its own, as stored alongside the account.
    pub salt: String,
}

/// Hashing primitive used for account passwords.
pub trait PasswordStore: Send + Sync {
    /// Hashes a plaintext password with a fresh salt.
    ///
    /// Fails with [`EngineError::PasswordPolicy`] when the plaintext is empty
    /// or shorter than the configured minimum.
    fn hash(&self, plaintext: &str) -> EngineResult<HashedPassword>;

    /// Checks a plaintext password against a stored hash and salt.
    fn verify(&self, plaintext: &str, hash: &str, salt: &str) -> EngineResult<bool>;
}

/// Argon2id implementation of [`PasswordStore`].
#[derive(Debug, Clone)]
pub struct Argon2PasswordStore {
    params: Params,
    min_length: usize,
}

/// Uses [`DEFAULT_MIN_PASSWORD_LENGTH`]. Build with
/// [`Argon2PasswordStore::from_policy`] when a loaded policy sets its own
/// minimum.
impl Default for Argon2PasswordStore {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PASSWORD_LENGTH)
    }
}

impl Argon2PasswordStore {
    /// Creates a store with the default Argon2id cost parameters.
    pub fn new(min_length: usize) -> Self {
        Self {
            params: Params::default(),
            min_length,
        }
    }

    /// Creates a store enforcing the policy's minimum password length.
    pub fn from_policy(policy: &AuthPolicy) -> Self {
        Self::new(policy.min_password_length)
    }

    /// Creates a store with explicit memory (KiB), iteration and parallelism
    /// costs.
    ///
    /// # Errors
    ///
    /// Returns `Hashing` when argon2 rejects the parameters.
    pub fn with_cost(
        min_length: usize,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> EngineResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            EngineError::Hashing {
                message: e.to_string(),
            }
        })?;
        Ok(Self { params, min_length })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordStore for Argon2PasswordStore {
    fn hash(&self, plaintext: &str) -> EngineResult<HashedPassword> {
        if plaintext.is_empty() {
            return Err(EngineError::PasswordPolicy {
                message: "Password is required".to_string(),
            });
        }
        if plaintext.chars().count() < self.min_length {
            return Err(EngineError::PasswordPolicy {
                message: format!("Password must be at least {} characters", self.min_length),
            });
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| EngineError::Hashing {
                message: e.to_string(),
            })?
            .to_string();

        Ok(HashedPassword {
            hash,
            salt: salt.as_str().to_string(),
        })
    }

    fn verify(&self, plaintext: &str, hash: &str, salt: &str) -> EngineResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| EngineError::Hashing {
            message: e.to_string(),
        })?;

        // The salt column must agree with the salt embedded in the hash.
        if parsed.salt.map(|s| s.as_str()) != Some(salt) {
            return Ok(false);
        }

        // Cost parameters come from the PHC string, not from this store.
        Ok(self
            .hasher()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
