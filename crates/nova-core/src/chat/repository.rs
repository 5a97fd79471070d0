//! ConversationRepository trait definition.
//!
//! Every operation is scoped by user id; resolution from username happens in
//! the services.

use nova_types::chat::{ChatMessage, Conversation};
use nova_types::error::RepositoryError;

/// Repository trait for conversation persistence.
///
/// Implementations live in nova-infra (e.g., `SqliteConversationRepository`).
pub trait ConversationRepository: Send + Sync {
    /// The user's conversation with the greatest `updated_at`, if any.
    fn latest(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// All of the user's conversations, ordered by `updated_at` DESC (ties by id DESC).
    fn list(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// A specific conversation, only if owned by the user.
    fn get(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Delete a conversation owned by the user. Returns `false` if no row matched.
    fn delete(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete every conversation owned by the user. Returns the number removed.
    fn clear(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Number of conversations owned by the user.
    fn count(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Insert an additional conversation, leaving existing ones untouched.
    fn insert(
        &self,
        user_id: i64,
        messages: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Atomically delete all of the user's conversations and insert one row
    /// holding `messages`, stamped with the current time.
    fn replace_current(
        &self,
        user_id: i64,
        messages: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;
}
