//! In-memory doubles for the ports, shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use nova_types::chat::{ChatMessage, Conversation};
use nova_types::error::{CredentialError, RepositoryError};
use nova_types::llm::{BackendStatus, CompletionRequest, CompletionResponse, InferenceError};
use nova_types::user::User;

use crate::chat::repository::ConversationRepository;
use crate::llm::gateway::InferenceGateway;
use crate::repository::user::UserRepository;
use crate::service::hash::{CredentialHasher, PasswordCheck};

#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    claim_winner: Arc<Mutex<Option<String>>>,
    stale_lookups: Arc<AtomicBool>,
}

impl MemoryUserRepository {
    /// Every later claim loses to a concurrent login that stored `hash`.
    pub fn lose_claims_to(&self, hash: &str) {
        *self.claim_winner.lock().unwrap() = Some(hash.to_string());
    }

    /// Lookups miss existing users, as if another request inserted them
    /// between the lookup and the insert.
    pub fn set_stale_lookups(&self, stale: bool) {
        self.stale_lookups.store(stale, Ordering::SeqCst);
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        username: &str,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(RepositoryError::Conflict(username.to_string()));
        }
        let user = User {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.map(str::to_string),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        if self.stale_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn claim_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let winner = self.claim_winner.lock().unwrap().clone();
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.id == user_id && u.password_hash.is_none())
        {
            Some(user) => match winner {
                Some(winner) => {
                    user.password_hash = Some(winner);
                    Ok(false)
                }
                None => {
                    user.password_hash = Some(password_hash.to_string());
                    Ok(true)
                }
            },
            None => Ok(false),
        }
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(RepositoryError::NotFound)?;
        user.password_hash = Some(password_hash.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct ConversationTable {
    rows: Vec<Conversation>,
    next_id: i64,
    clock: i64,
}

impl ConversationTable {
    fn push(&mut self, user_id: i64, messages: &[ChatMessage]) -> Conversation {
        self.next_id += 1;
        self.clock += 1;
        let conversation = Conversation {
            id: self.next_id,
            user_id,
            messages: messages.to_vec(),
            // Strictly increasing so ordering is deterministic in tests.
            updated_at: DateTime::<Utc>::from_timestamp(1_700_000_000 + self.clock, 0)
                .unwrap_or_else(Utc::now),
        };
        self.rows.push(conversation.clone());
        conversation
    }
}

/// Conversation store double. Writes can be slowed down or made to fail.
#[derive(Clone, Default)]
pub struct MemoryConversationRepository {
    table: Arc<Mutex<ConversationTable>>,
    fail_writes: Arc<AtomicBool>,
    write_delay_ms: Arc<AtomicU64>,
    writes: Arc<AtomicUsize>,
}

impl MemoryConversationRepository {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn rows_for(&self, user_id: i64) -> Vec<Conversation> {
        let table = self.table.lock().unwrap();
        table
            .rows
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn before_write(&self) -> Result<(), RepositoryError> {
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        Ok(())
    }
}

impl ConversationRepository for MemoryConversationRepository {
    async fn latest(&self, user_id: i64) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.list(user_id).await?.into_iter().next())
    }

    async fn list(&self, user_id: i64) -> Result<Vec<Conversation>, RepositoryError> {
        let mut rows = self.rows_for(user_id);
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .rows_for(user_id)
            .into_iter()
            .find(|c| c.id == conversation_id))
    }

    async fn delete(&self, user_id: i64, conversation_id: i64) -> Result<bool, RepositoryError> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table
            .rows
            .retain(|c| !(c.user_id == user_id && c.id == conversation_id));
        Ok(table.rows.len() < before)
    }

    async fn clear(&self, user_id: i64) -> Result<u64, RepositoryError> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|c| c.user_id != user_id);
        Ok((before - table.rows.len()) as u64)
    }

    async fn count(&self, user_id: i64) -> Result<u64, RepositoryError> {
        Ok(self.rows_for(user_id).len() as u64)
    }

    async fn insert(
        &self,
        user_id: i64,
        messages: &[ChatMessage],
    ) -> Result<Conversation, RepositoryError> {
        self.before_write().await?;
        Ok(self.table.lock().unwrap().push(user_id, messages))
    }

    async fn replace_current(
        &self,
        user_id: i64,
        messages: &[ChatMessage],
    ) -> Result<Conversation, RepositoryError> {
        self.before_write().await?;
        let mut table = self.table.lock().unwrap();
        table.rows.retain(|c| c.user_id != user_id);
        Ok(table.push(user_id, messages))
    }
}

/// Reversible "hash" so tests stay fast. `old:` prefixed values count as outdated.
pub struct PlainHasher;

impl PlainHasher {
    pub fn outdated(password: &str) -> String {
        format!("old:{password}")
    }
}

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> PasswordCheck {
        if stored_hash == format!("plain:{password}") {
            PasswordCheck::Match
        } else if stored_hash == Self::outdated(password) {
            PasswordCheck::MatchOutdated
        } else {
            PasswordCheck::Mismatch
        }
    }
}

/// [`PlainHasher`] that counts verifications.
#[derive(Clone, Default)]
pub struct CountingHasher {
    verifies: Arc<AtomicUsize>,
}

impl CountingHasher {
    pub fn verify_count(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl CredentialHasher for CountingHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        PlainHasher.hash(password)
    }

    fn verify(&self, password: &str, stored_hash: &str) -> PasswordCheck {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        PlainHasher.verify(password, stored_hash)
    }
}

/// Scripted inference backend.
#[derive(Clone)]
pub struct ScriptedGateway {
    status: Arc<Mutex<BackendStatus>>,
    replies: Arc<Mutex<VecDeque<Result<String, InferenceError>>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedGateway {
    pub fn online() -> Self {
        Self {
            status: Arc::new(Mutex::new(BackendStatus::Online)),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn offline() -> Self {
        let gateway = Self::online();
        *gateway.status.lock().unwrap() = BackendStatus::Offline;
        gateway
    }

    pub fn reply(self, content: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(content.to_string()));
        self
    }

    pub fn fail(self, error: InferenceError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl InferenceGateway for ScriptedGateway {
    async fn probe(&self) -> BackendStatus {
        *self.status.lock().unwrap()
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, InferenceError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()));
        next.map(|content| CompletionResponse {
            content,
            model: Some("scripted".to_string()),
        })
    }
}
