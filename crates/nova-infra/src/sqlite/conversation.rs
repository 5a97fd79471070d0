//! SQLite conversation repository implementation.
//!
//! A conversation row stores its messages as a JSON array. Reads go through
//! the reader pool; writes through the single writer connection.

use chrono::Utc;
use nova_core::chat::repository::ConversationRepository;
use nova_types::chat::{ChatMessage, Conversation};
use nova_types::error::RepositoryError;
use sqlx::Row;

use super::datetime::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

const SELECT_COLUMNS: &str = "SELECT id, user_id, messages, updated_at FROM conversations";

/// SQLite-backed implementation of `ConversationRepository`.
#[derive(Clone)]
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConversationRow {
    id: i64,
    user_id: i64,
    messages: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            messages: row.try_get("messages")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let messages: Vec<ChatMessage> = serde_json::from_str(&self.messages).map_err(|e| {
            RepositoryError::Query(format!("invalid messages in conversation {}: {e}", self.id))
        })?;
        Ok(Conversation {
            id: self.id,
            user_id: self.user_id,
            messages,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Conversation>, RepositoryError> {
    let mut conversations = Vec::with_capacity(rows.len());
    for row in rows {
        let conv_row =
            ConversationRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        conversations.push(conv_row.into_conversation()?);
    }
    Ok(conversations)
}

fn encode_messages(messages: &[ChatMessage]) -> Result<String, RepositoryError> {
    serde_json::to_string(messages)
        .map_err(|e| RepositoryError::Query(format!("failed to encode messages: {e}")))
}

impl ConversationRepository for SqliteConversationRepository {
    async fn latest(&self, user_id: i64) -> Result<Option<Conversation>, RepositoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE user_id = ? ORDER BY updated_at DESC, id DESC LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, user_id: i64) -> Result<Vec<Conversation>, RepositoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE user_id = ? ORDER BY updated_at DESC, id DESC");
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_rows(&rows)
    }

    async fn get(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ? AND user_id = ?");
        let row = sqlx::query(&sql)
            .bind(conversation_id)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: i64, conversation_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ? AND user_id = ?")
            .bind(conversation_id)
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn count(&self, user_id: i64) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn insert(
        &self,
        user_id: i64,
        messages: &[ChatMessage],
    ) -> Result<Conversation, RepositoryError> {
        let encoded = encode_messages(messages)?;
        let updated_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO conversations (user_id, messages, updated_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(&encoded)
        .bind(format_datetime(&updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Conversation {
            id: result.last_insert_rowid(),
            user_id,
            messages: messages.to_vec(),
            updated_at,
        })
    }

    async fn replace_current(
        &self,
        user_id: i64,
        messages: &[ChatMessage],
    ) -> Result<Conversation, RepositoryError> {
        let encoded = encode_messages(messages)?;
        let updated_at = Utc::now();

        // Delete and insert commit together; a failure leaves the old rows.
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM conversations WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO conversations (user_id, messages, updated_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(&encoded)
        .bind(format_datetime(&updated_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Conversation {
            id: result.last_insert_rowid(),
            user_id,
            messages: messages.to_vec(),
            updated_at,
        })
    }
}
