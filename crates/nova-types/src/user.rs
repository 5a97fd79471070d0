//! User identity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `password_hash` is `None` for legacy records created before passwords
/// existed; it is filled in on the first successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_legacy(&self) -> bool {
        self.password_hash.is_none()
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub has_conversations: bool,
}

impl AuthenticatedUser {
    pub fn is_new_user(&self) -> bool {
        !self.has_conversations
    }
}
