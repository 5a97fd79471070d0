//! Argon2id password hashing.
//!
//! New hashes are PHC strings (`$argon2id$v=19$...`) with a random salt.
//! Hashes written by the legacy server are unsalted lowercase SHA-256 hex;
//! they still verify but are reported as outdated so the caller can
//! re-hash on login.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use nova_core::service::hash::{CredentialHasher, PasswordCheck};
use nova_types::error::CredentialError;

/// Argon2id implementation of `CredentialHasher` with default parameters.
#[derive(Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

fn legacy_sha256(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn is_legacy_hash(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> PasswordCheck {
        if is_legacy_hash(stored_hash) {
            return if legacy_sha256(password).eq_ignore_ascii_case(stored_hash) {
                PasswordCheck::MatchOutdated
            } else {
                PasswordCheck::Mismatch
            };
        }

        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            tracing::warn!("Stored password hash is not a recognised format");
            return PasswordCheck::Mismatch;
        };
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => PasswordCheck::Match,
            Err(_) => PasswordCheck::Mismatch,
        }
    }
}
