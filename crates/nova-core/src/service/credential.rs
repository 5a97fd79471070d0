//! Credential service: registration, login, and legacy-account migration.
//!
//! Unknown usernames and wrong passwords both fail with
//! `CredentialError::InvalidCredentials` so callers cannot tell which factor
//! was wrong. An unknown username still pays for one password verification,
//! so response time does not tell them either.
//!
//! Hashing is CPU-bound and runs on Tokio's blocking pool.

use std::sync::Arc;

use nova_types::error::{CredentialError, RepositoryError};
use nova_types::user::{AuthenticatedUser, User};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::chat::repository::ConversationRepository;
use crate::repository::user::UserRepository;
use crate::service::hash::{CredentialHasher, PasswordCheck};

/// Password hashed once to give unknown-user logins something to verify against.
const DUMMY_PASSWORD: &str = "nova-unknown-user";

/// Owns user identity records and password verification.
///
/// Generic over the repositories and hasher to keep nova-core free of IO.
pub struct CredentialService<U: UserRepository, C: ConversationRepository, H: CredentialHasher> {
    users: U,
    conversations: C,
    hasher: Arc<H>,
    dummy_hash: OnceCell<String>,
    min_password_length: usize,
}

impl<U: UserRepository, C: ConversationRepository, H: CredentialHasher> CredentialService<U, C, H> {
    pub fn new(users: U, conversations: C, hasher: H, min_password_length: usize) -> Self {
        Self {
            users,
            conversations,
            hasher: Arc::new(hasher),
            dummy_hash: OnceCell::new(),
            min_password_length,
        }
    }

    /// Register a new user with a hashed password.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, CredentialError> {
        let (username, password) = normalize(username, password)?;

        if password.chars().count() < self.min_password_length {
            return Err(CredentialError::WeakPassword {
                min_length: self.min_password_length,
            });
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(CredentialError::AlreadyExists);
        }

        let hash = self.hash_password(password).await?;
        let user = self
            .users
            .create(username, Some(&hash))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CredentialError::AlreadyExists,
                other => CredentialError::Storage(other),
            })?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify credentials and report whether the user has saved conversations.
    ///
    /// A legacy record without a password hash adopts the supplied password
    /// on its first login.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, CredentialError> {
        let (username, password) = normalize(username, password)?;

        let Some(mut user) = self.users.find_by_username(username).await? else {
            self.verify_dummy(password).await;
            return Err(CredentialError::InvalidCredentials);
        };

        match user.password_hash.clone() {
            None => {
                let hash = self.hash_password(password).await?;
                if self.users.claim_password_hash(user.id, &hash).await? {
                    info!(user_id = user.id, "Set password for legacy user");
                    user.password_hash = Some(hash);
                } else {
                    // Another login migrated this user concurrently; verify
                    // against whatever it stored.
                    let current = self
                        .users
                        .find_by_username(username)
                        .await?
                        .ok_or(CredentialError::InvalidCredentials)?;
                    let stored = current
                        .password_hash
                        .clone()
                        .ok_or(CredentialError::InvalidCredentials)?;
                    if self.verify_password(password, &stored).await? == PasswordCheck::Mismatch {
                        debug!(user_id = user.id, "Password mismatch after lost claim");
                        return Err(CredentialError::InvalidCredentials);
                    }
                    user = current;
                }
            }
            Some(stored) => match self.verify_password(password, &stored).await? {
                PasswordCheck::Match => {}
                PasswordCheck::MatchOutdated => self.upgrade_hash(&mut user, password).await,
                PasswordCheck::Mismatch => {
                    debug!(user_id = user.id, "Password mismatch");
                    return Err(CredentialError::InvalidCredentials);
                }
            },
        }

        let has_conversations = self.has_conversations(user.id).await?;
        Ok(AuthenticatedUser {
            user,
            has_conversations,
        })
    }

    pub async fn has_conversations(&self, user_id: i64) -> Result<bool, CredentialError> {
        Ok(self.conversations.count(user_id).await? > 0)
    }

    /// Look up a user without verifying a password.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>, CredentialError> {
        Ok(self.users.find_by_username(username.trim()).await?)
    }

    /// Re-hash with the current scheme. Failure is logged; the login stands.
    async fn upgrade_hash(&self, user: &mut User, password: &str) {
        let hash = match self.hash_password(password).await {
            Ok(hash) => hash,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Password hash upgrade failed");
                return;
            }
        };
        match self.users.update_password_hash(user.id, &hash).await {
            Ok(()) => {
                info!(user_id = user.id, "Upgraded legacy password hash");
                user.password_hash = Some(hash);
            }
            Err(e) => warn!(user_id = user.id, error = %e, "Password hash upgrade failed"),
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| CredentialError::Hashing(format!("hashing task failed: {e}")))?
    }

    async fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<PasswordCheck, CredentialError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| CredentialError::Hashing(format!("verification task failed: {e}")))
    }

    /// Burn one verification for a username that does not exist.
    async fn verify_dummy(&self, password: &str) {
        let dummy = match self
            .dummy_hash
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await
        {
            Ok(hash) => hash.clone(),
            Err(e) => {
                warn!(error = %e, "Failed to prepare dummy password hash");
                return;
            }
        };
        if let Err(e) = self.verify_password(password, &dummy).await {
            warn!(error = %e, "Dummy password verification failed");
        }
    }
}

fn normalize<'a>(username: &'a str, password: &'a str) -> Result<(&'a str, &'a str), CredentialError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(CredentialError::Validation(
            "Username and password are required".to_string(),
        ));
    }
    Ok((username, password))
}
