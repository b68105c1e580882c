//! Content fingerprints and credential verification
//!
//! Two concerns live here:
//!
//! - stable SHA-256 fingerprints for blobs and commit bodies, rendered as
//!   64 lowercase hex characters;
//! - an opaque credential interface. `make` produces a self-describing
//!   verifier string and `verify` checks a candidate against it without any
//!   external state. The default implementation is Argon2id with PHC-format
//!   output; a plaintext implementation exists for deterministic tests.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{Error, Result};

/// SHA-256 of a byte slice as lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// SHA-256 of a file's contents as lowercase hex.
pub fn hash_file(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    Ok(hash_bytes(&data))
}

/// Opaque credential subsystem.
///
/// Implementations must produce verifiers that `verify` can check with no
/// state beyond the verifier string itself.
pub trait Credentials {
    fn make(&self, plaintext: &str) -> Result<String>;
    fn verify(&self, stored: &str, candidate: &str) -> Result<bool>;
}

/// Argon2id credentials producing PHC strings (`$argon2id$...`).
#[derive(Default)]
pub struct ArgonCredentials {
    argon2: Argon2<'static>,
}

impl ArgonCredentials {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Credentials for ArgonCredentials {
    fn make(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| Error::Hashing(format!("failed to hash password: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, stored: &str, candidate: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| Error::Hashing(format!("invalid verifier format: {e}")))?;
        match self.argon2.verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Hashing(format!("failed to verify password: {e}"))),
        }
    }
}

/// Deterministic credentials for tests. Stores the plaintext with a marker
/// prefix; never use outside test setups.
pub struct PlaintextCredentials;

impl Credentials for PlaintextCredentials {
    fn make(&self, plaintext: &str) -> Result<String> {
        Ok(format!("plain${plaintext}"))
    }

    fn verify(&self, stored: &str, candidate: &str) -> Result<bool> {
        match stored.strip_prefix("plain$") {
            Some(rest) => Ok(rest == candidate),
            None => Err(Error::Hashing("invalid verifier format".into())),
        }
    }
}
