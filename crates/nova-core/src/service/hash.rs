//! CredentialHasher trait for password hashing.
//!
//! Defined in nova-core so `CredentialService` can hash and verify passwords
//! without coupling to a specific algorithm. The Argon2id adapter lives in
//! nova-infra.

use nova_types::error::CredentialError;

/// Result of checking a password against a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// Matches a current-format hash.
    Match,
    /// Matches, but the stored hash uses an outdated scheme and should be replaced.
    MatchOutdated,
    Mismatch,
}

/// Abstraction over one-way password hashing.
///
/// Implementations may be slow on purpose; callers run them on a blocking
/// thread, hence the `'static` bound.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Produce a salted, self-describing hash of `password`.
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Check `password` against a previously stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> PasswordCheck;
}
