//! Application state wiring all services together.
//!
//! Services are generic over repository, hasher, and gateway traits;
//! AppState pins them to the concrete infra implementations.

use std::sync::Arc;

use nova_core::chat::orchestrator::ChatOrchestrator;
use nova_core::chat::save_queue::SaveQueue;
use nova_core::chat::service::ConversationService;
use nova_core::llm::health::BackendHealth;
use nova_core::service::credential::CredentialService;
use nova_infra::crypto::password::Argon2CredentialHasher;
use nova_infra::llm::openai_compat::OpenAiCompatGateway;
use nova_infra::sqlite::conversation::SqliteConversationRepository;
use nova_infra::sqlite::pool::DatabasePool;
use nova_infra::sqlite::user::SqliteUserRepository;
use nova_types::config::NovaConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteCredentialService =
    CredentialService<SqliteUserRepository, SqliteConversationRepository, Argon2CredentialHasher>;

pub type ConcreteConversationService =
    ConversationService<SqliteConversationRepository, SqliteUserRepository>;

pub type ConcreteOrchestrator = ChatOrchestrator<OpenAiCompatGateway, SqliteConversationRepository>;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<ConcreteCredentialService>,
    pub conversations: Arc<ConcreteConversationService>,
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<NovaConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open the database (running migrations) and wire services.
    pub async fn init(config: NovaConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database.url()).await?;
        let gateway = OpenAiCompatGateway::new(&config.inference)?;

        let credentials = CredentialService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
            config.security.password_min_length,
        );

        let conversations = ConversationService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteUserRepository::new(db_pool.clone()),
        );

        let saves = SaveQueue::new(Arc::new(SqliteConversationRepository::new(db_pool.clone())));
        let orchestrator = ChatOrchestrator::new(Arc::new(gateway), saves, BackendHealth::new());

        tracing::info!(
            database = %config.database.file,
            backend = %config.inference.completions_url(),
            "Application state initialized"
        );

        Ok(Self {
            credentials: Arc::new(credentials),
            conversations: Arc::new(conversations),
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            db_pool,
        })
    }

    /// Drain pending conversation saves and close the database.
    pub async fn shutdown(&self) {
        self.orchestrator.save_queue().flush_all().await;
        self.db_pool.close().await;
    }
}
