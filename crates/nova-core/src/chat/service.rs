//! Conversation service: the synchronous read and management paths.
//!
//! Every operation takes a username and resolves it to a user id. An
//! unknown username behaves like a user without conversations.

use nova_types::chat::{
    ChatMessage, Conversation, ConversationPreview, ConversationSnapshot, ConversationSummary,
};
use nova_types::error::ConversationError;
use nova_types::user::User;
use tracing::info;

use crate::chat::repository::ConversationRepository;
use crate::repository::user::UserRepository;

/// Load, list, select, delete, and clear a user's conversations.
pub struct ConversationService<C: ConversationRepository, U: UserRepository> {
    conversations: C,
    users: U,
}

impl<C: ConversationRepository, U: UserRepository> ConversationService<C, U> {
    pub fn new(conversations: C, users: U) -> Self {
        Self {
            conversations,
            users,
        }
    }

    /// Access the conversation repository.
    pub fn conversation_repo(&self) -> &C {
        &self.conversations
    }

    /// The most recently updated conversation, or an empty snapshot.
    pub async fn load_latest(&self, username: &str) -> Result<ConversationSnapshot, ConversationError> {
        let Some(user) = self.resolve(username).await? else {
            return Ok(ConversationSnapshot::default());
        };
        Ok(self
            .conversations
            .latest(user.id)
            .await?
            .map(Conversation::into_snapshot)
            .unwrap_or_default())
    }

    /// All conversations, most recently updated first.
    pub async fn list(&self, username: &str) -> Result<Vec<ConversationSummary>, ConversationError> {
        let Some(user) = self.resolve(username).await? else {
            return Ok(Vec::new());
        };
        let conversations = self.conversations.list(user.id).await?;
        Ok(conversations.iter().map(Conversation::summary).collect())
    }

    /// A specific conversation owned by the user.
    pub async fn select(
        &self,
        username: &str,
        conversation_id: i64,
    ) -> Result<ConversationSnapshot, ConversationError> {
        let user = self
            .resolve(username)
            .await?
            .ok_or(ConversationError::NotFound)?;
        self.conversations
            .get(user.id, conversation_id)
            .await?
            .map(Conversation::into_snapshot)
            .ok_or(ConversationError::NotFound)
    }

    /// Delete a conversation, only if the user owns it.
    pub async fn delete(&self, username: &str, conversation_id: i64) -> Result<(), ConversationError> {
        let user = self
            .resolve(username)
            .await?
            .ok_or(ConversationError::NotFound)?;
        if !self.conversations.delete(user.id, conversation_id).await? {
            return Err(ConversationError::NotFound);
        }
        info!(user_id = user.id, conversation_id, "Conversation deleted");
        Ok(())
    }

    /// Delete every conversation the user owns.
    pub async fn clear_all(&self, username: &str) -> Result<(), ConversationError> {
        if let Some(user) = self.resolve(username).await? {
            let removed = self.conversations.clear(user.id).await?;
            info!(user_id = user.id, removed, "Conversations cleared");
        }
        Ok(())
    }

    /// Preview of the latest conversation.
    pub async fn summary(&self, username: &str) -> Result<ConversationPreview, ConversationError> {
        let Some(user) = self.resolve(username).await? else {
            return Ok(ConversationPreview::default());
        };
        Ok(self
            .conversations
            .latest(user.id)
            .await?
            .map(|c| c.preview())
            .unwrap_or_default())
    }

    /// Start an additional conversation next to the existing ones.
    ///
    /// Returns `NotFound` for an unknown username.
    pub async fn start_new(
        &self,
        username: &str,
        messages: &[ChatMessage],
    ) -> Result<Conversation, ConversationError> {
        let user = self
            .resolve(username)
            .await?
            .ok_or(ConversationError::NotFound)?;
        let conversation = self.conversations.insert(user.id, messages).await?;
        info!(user_id = user.id, conversation_id = conversation.id, "Conversation started");
        Ok(conversation)
    }

    async fn resolve(&self, username: &str) -> Result<Option<User>, ConversationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ConversationError::Validation("Username is required".to_string()));
        }
        Ok(self.users.find_by_username(username).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryConversationRepository, MemoryUserRepository};
    use nova_types::chat::EMPTY_TITLE;

    struct Fixture {
        svc: ConversationService<MemoryConversationRepository, MemoryUserRepository>,
        users: MemoryUserRepository,
        conversations: MemoryConversationRepository,
    }

    fn fixture() -> Fixture {
        let users = MemoryUserRepository::default();
        let conversations = MemoryConversationRepository::default();
        Fixture {
            svc: ConversationService::new(conversations.clone(), users.clone()),
            users,
            conversations,
        }
    }

    fn turn(q: &str, a: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::user(q), ChatMessage::assistant(a)]
    }

    #[tokio::test]
    async fn load_latest_empty_for_unknown_and_new_users() {
        let f = fixture();
        assert!(f.svc.load_latest("ghost").await.unwrap().is_empty());

        f.users.create("alice", Some("h")).await.unwrap();
        let snap = f.svc.load_latest("alice").await.unwrap();
        assert!(snap.is_empty());
        assert!(snap.messages.is_empty());
    }

    #[tokio::test]
    async fn load_latest_returns_newest() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        f.conversations.insert(alice.id, &turn("old", "a")).await.unwrap();
        f.conversations.insert(alice.id, &turn("new", "b")).await.unwrap();

        let snap = f.svc.load_latest("alice").await.unwrap();
        assert_eq!(snap.messages[0].content, "new");
        assert!(snap.updated_at.is_some());
    }

    #[tokio::test]
    async fn list_sorted_desc_with_titles() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        f.conversations.insert(alice.id, &turn("first", "a")).await.unwrap();
        f.conversations.insert(alice.id, &[]).await.unwrap();
        f.conversations.insert(alice.id, &turn("third", "c")).await.unwrap();

        let listed = f.svc.list("alice").await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
        assert_eq!(listed[0].title, "third");
        assert_eq!(listed[1].title, EMPTY_TITLE);
        assert_eq!(listed[1].message_count, 0);
        assert_eq!(listed[2].message_count, 2);
    }

    #[tokio::test]
    async fn select_requires_ownership() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        f.users.create("bob", Some("h")).await.unwrap();
        let conv = f.conversations.insert(alice.id, &turn("q", "a")).await.unwrap();

        let snap = f.svc.select("alice", conv.id).await.unwrap();
        assert_eq!(snap.messages.len(), 2);

        assert!(matches!(
            f.svc.select("bob", conv.id).await.unwrap_err(),
            ConversationError::NotFound
        ));
        assert!(matches!(
            f.svc.select("alice", 999).await.unwrap_err(),
            ConversationError::NotFound
        ));
    }

    #[tokio::test]
    async fn delete_other_users_conversation_is_not_found() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        f.users.create("bob", Some("h")).await.unwrap();
        let a1 = f.conversations.insert(alice.id, &turn("q1", "a1")).await.unwrap();
        f.conversations.insert(alice.id, &turn("q2", "a2")).await.unwrap();

        let err = f.svc.delete("bob", a1.id).await.unwrap_err();
        assert!(matches!(err, ConversationError::NotFound));
        assert_eq!(f.conversations.rows_for(alice.id).len(), 2);

        f.svc.delete("alice", a1.id).await.unwrap();
        assert_eq!(f.conversations.rows_for(alice.id).len(), 1);
    }

    #[tokio::test]
    async fn clear_all_only_touches_owner() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        let bob = f.users.create("bob", Some("h")).await.unwrap();
        f.conversations.insert(alice.id, &turn("q", "a")).await.unwrap();
        f.conversations.insert(bob.id, &turn("q", "a")).await.unwrap();

        f.svc.clear_all("alice").await.unwrap();
        f.svc.clear_all("ghost").await.unwrap();

        assert!(f.conversations.rows_for(alice.id).is_empty());
        assert_eq!(f.conversations.rows_for(bob.id).len(), 1);
    }

    #[tokio::test]
    async fn summary_previews_latest() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        assert_eq!(f.svc.summary("alice").await.unwrap().total_messages, 0);

        f.conversations.insert(alice.id, &turn("hello", "hi there")).await.unwrap();
        let summary = f.svc.summary("alice").await.unwrap();
        assert_eq!(summary.total_messages, 2);
        assert_eq!(summary.preview[0].role, "You");
        assert_eq!(summary.preview[1].content, "hi there");
    }

    #[tokio::test]
    async fn start_new_keeps_existing_conversations() {
        let f = fixture();
        let alice = f.users.create("alice", Some("h")).await.unwrap();
        f.conversations.insert(alice.id, &turn("q", "a")).await.unwrap();

        f.svc.start_new("alice", &[]).await.unwrap();
        assert_eq!(f.conversations.rows_for(alice.id).len(), 2);

        assert!(matches!(
            f.svc.start_new("ghost", &[]).await.unwrap_err(),
            ConversationError::NotFound
        ));
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let f = fixture();
        assert!(matches!(
            f.svc.list("   ").await.unwrap_err(),
            ConversationError::Validation(_)
        ));
    }
}
