//! UserRepository trait definition.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use nova_types::error::RepositoryError;
use nova_types::user::User;

/// Repository trait for user identity records.
///
/// Implementations live in nova-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Insert a new user. `password_hash` is `None` only for legacy imports.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    fn create(
        &self,
        username: &str,
        password_hash: Option<&str>,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by exact (case-sensitive) username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Set the password hash of a legacy user, only if it is still unset.
    ///
    /// Returns `true` if this call populated the hash, `false` if another
    /// writer got there first.
    fn claim_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Unconditionally replace a user's password hash (hash upgrades).
    fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
