//! Per-user serialized background saves.
//!
//! Each user gets one lane: an unbounded `mpsc` channel drained by a single
//! task. Saves for the same user are applied in the order they were
//! enqueued; different users never wait on each other. A failed save is
//! logged and dropped because the reply it belongs to has already been
//! delivered.
//!
//! A lane that stays idle for [`LANE_IDLE_TIMEOUT`] retires: it unregisters
//! itself, applies whatever was already queued, and exits. The next save for
//! that user starts a fresh lane.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use nova_types::chat::ChatMessage;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::chat::repository::ConversationRepository;

/// How long a lane waits for work before retiring.
pub const LANE_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Work item for a user's save lane.
#[derive(Debug)]
enum SaveJob {
    /// Replace the user's current conversation with this history.
    Replace { messages: Vec<ChatMessage> },
    /// Signal once every job queued before it has been applied.
    Flush(oneshot::Sender<()>),
}

type Lanes = DashMap<i64, mpsc::UnboundedSender<SaveJob>>;

/// Fire-and-forget writer for `replace_current`.
pub struct SaveQueue<C: ConversationRepository + 'static> {
    repo: Arc<C>,
    lanes: Arc<Lanes>,
    idle_timeout: Duration,
}

impl<C: ConversationRepository + 'static> Clone for SaveQueue<C> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            lanes: Arc::clone(&self.lanes),
            idle_timeout: self.idle_timeout,
        }
    }
}

impl<C: ConversationRepository + 'static> SaveQueue<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self::with_idle_timeout(repo, LANE_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(repo: Arc<C>, idle_timeout: Duration) -> Self {
        Self {
            repo,
            lanes: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    /// Queue a save without waiting for it. Must be called inside a Tokio runtime.
    pub fn enqueue(&self, user_id: i64, messages: Vec<ChatMessage>) {
        self.send(user_id, SaveJob::Replace { messages });
    }

    /// Wait until every save queued so far for `user_id` has been applied.
    pub async fn flush(&self, user_id: i64) {
        let Some(sender) = self.lanes.get(&user_id).map(|s| s.clone()) else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        if sender.send(SaveJob::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Wait for every lane to drain. Used on shutdown.
    pub async fn flush_all(&self) {
        let user_ids: Vec<i64> = self.lanes.iter().map(|entry| *entry.key()).collect();
        for user_id in user_ids {
            self.flush(user_id).await;
        }
    }

    /// Number of users with a live lane.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    fn send(&self, user_id: i64, job: SaveJob) {
        let sender = self.lane(user_id);
        if let Err(mpsc::error::SendError(job)) = sender.send(job) {
            // Lane retired or its worker died. Only drop the entry if it is
            // still a closed one; a concurrent sender may have replaced it.
            debug!(user_id, "Save lane closed, respawning");
            self.lanes.remove_if(&user_id, |_, s| s.is_closed());
            if self.lane(user_id).send(job).is_err() {
                warn!(user_id, "Save dropped: lane unavailable");
            }
        }
    }

    fn lane(&self, user_id: i64) -> mpsc::UnboundedSender<SaveJob> {
        self.lanes
            .entry(user_id)
            .or_insert_with(|| self.spawn_lane(user_id))
            .clone()
    }

    fn spawn_lane(&self, user_id: i64) -> mpsc::UnboundedSender<SaveJob> {
        let (tx, mut rx) = mpsc::unbounded_channel::<SaveJob>();
        let repo = Arc::clone(&self.repo);
        let lanes = Arc::clone(&self.lanes);
        let idle_timeout = self.idle_timeout;
        let own = tx.clone();

        tokio::spawn(async move {
            loop {
                match tokio::time::timeout(idle_timeout, rx.recv()).await {
                    Ok(Some(job)) => apply(repo.as_ref(), user_id, job).await,
                    Ok(None) => break,
                    Err(_) => {
                        lanes.remove_if(&user_id, |_, s| s.same_channel(&own));
                        // Later sends fail and go to a fresh lane; apply what
                        // made it in before the close.
                        rx.close();
                        while let Some(job) = rx.recv().await {
                            apply(repo.as_ref(), user_id, job).await;
                        }
                        debug!(user_id, "Save lane retired");
                        break;
                    }
                }
            }
        });
        tx
    }
}

async fn apply<C: ConversationRepository>(repo: &C, user_id: i64, job: SaveJob) {
    match job {
        SaveJob::Replace { messages } => match repo.replace_current(user_id, &messages).await {
            Ok(conversation) => debug!(
                user_id,
                conversation_id = conversation.id,
                messages = messages.len(),
                "Conversation saved"
            ),
            Err(e) => warn!(
                user_id,
                error = %e,
                "Background conversation save failed; turn not persisted"
            ),
        },
        SaveJob::Flush(done) => {
            let _ = done.send(());
        }
    }
}
