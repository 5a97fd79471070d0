//! Conversation and message types for the Nova chat relay.
//!
//! A conversation is an ordered list of [`ChatMessage`]s owned by exactly one
//! user. Turns are appended in user -> assistant pairs; the position of a
//! message is its index in the list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Maximum number of characters of the first user message used as a title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Title shown for a conversation that has no user message yet.
pub const EMPTY_TITLE: &str = "Empty conversation";

/// Number of trailing messages included in a conversation preview.
pub const PREVIEW_MESSAGES: usize = 6;

/// Maximum number of characters per previewed message.
pub const PREVIEW_MAX_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name, as used by chat-completions APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted conversation row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub messages: Vec<ChatMessage>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Title derived from the first user message, or [`EMPTY_TITLE`].
    pub fn title(&self) -> String {
        self.messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| truncate_with_ellipsis(&m.content, TITLE_MAX_CHARS))
            .unwrap_or_else(|| EMPTY_TITLE.to_string())
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            title: self.title(),
            message_count: self.messages.len(),
            updated_at: self.updated_at,
        }
    }

    pub fn into_snapshot(self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages,
            updated_at: Some(self.updated_at),
        }
    }

    /// Preview of the trailing messages, labelled for display.
    pub fn preview(&self) -> ConversationPreview {
        let start = self.messages.len().saturating_sub(PREVIEW_MESSAGES);
        let preview = self.messages[start..]
            .iter()
            .map(|m| PreviewMessage {
                role: match m.role {
                    MessageRole::User => "You".to_string(),
                    MessageRole::Assistant => "AI".to_string(),
                },
                content: truncate_with_ellipsis(&m.content, PREVIEW_MAX_CHARS),
            })
            .collect();

        ConversationPreview {
            updated_at: Some(self.updated_at),
            total_messages: self.messages.len(),
            preview,
        }
    }
}

/// One entry of a conversation listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: i64,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// Messages of a loaded conversation. `updated_at` is `None` when the user
/// has no conversation at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<ChatMessage>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConversationSnapshot {
    pub fn is_empty(&self) -> bool {
        self.updated_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewMessage {
    pub role: String,
    pub content: String,
}

/// Short digest of the latest conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationPreview {
    pub updated_at: Option<DateTime<Utc>>,
    pub total_messages: usize,
    pub preview: Vec<PreviewMessage>,
}

/// Result of a completed turn: the assistant reply and the history with the
/// user message and the reply appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

/// Keep the first `max_chars` characters, appending `...` if anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(messages: Vec<ChatMessage>) -> Conversation {
        Conversation {
            id: 1,
            user_id: 1,
            messages,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_serde_shape() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn test_title_uses_first_user_message() {
        let conv = conversation(vec![
            ChatMessage::assistant("greeting"),
            ChatMessage::user("first question"),
            ChatMessage::user("second question"),
        ]);
        assert_eq!(conv.title(), "first question");
    }

    #[test]
    fn test_title_truncates_long_message() {
        let long = "x".repeat(60);
        let conv = conversation(vec![ChatMessage::user(long)]);
        let title = conv.title();
        assert_eq!(title, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_title_exactly_fifty_chars_is_not_truncated() {
        let exact = "y".repeat(50);
        let conv = conversation(vec![ChatMessage::user(exact.clone())]);
        assert_eq!(conv.title(), exact);
    }

    #[test]
    fn test_title_placeholder_without_user_message() {
        assert_eq!(conversation(vec![]).title(), EMPTY_TITLE);
        let conv = conversation(vec![ChatMessage::assistant("only me")]);
        assert_eq!(conv.title(), EMPTY_TITLE);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(51);
        let out = truncate_with_ellipsis(&text, 50);
        assert_eq!(out.chars().count(), 53);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_last_six_and_labels_roles() {
        let mut messages = Vec::new();
        for i in 0..5 {
            messages.push(ChatMessage::user(format!("q{i}")));
            messages.push(ChatMessage::assistant(format!("a{i}")));
        }
        let preview = conversation(messages).preview();
        assert_eq!(preview.total_messages, 10);
        assert_eq!(preview.preview.len(), 6);
        assert_eq!(preview.preview[0].role, "You");
        assert_eq!(preview.preview[0].content, "q2");
        assert_eq!(preview.preview[5].role, "AI");
        assert_eq!(preview.preview[5].content, "a4");
    }

    #[test]
    fn test_preview_truncates_content() {
        let conv = conversation(vec![ChatMessage::assistant("z".repeat(150))]);
        let preview = conv.preview();
        assert_eq!(preview.preview[0].content.chars().count(), 103);
    }

    #[test]
    fn test_snapshot_default_is_empty() {
        assert!(ConversationSnapshot::default().is_empty());
        let snap = conversation(vec![]).into_snapshot();
        assert!(!snap.is_empty());
    }
}
