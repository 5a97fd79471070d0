//! Configuration types for the Nova chat relay.
//!
//! `NovaConfig` represents the `nova.toml` document that controls the
//! inference backend, the HTTP bind address, the database file, and password
//! policy. Every field has a default so a partial (or missing) file works.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaConfig {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Where and how to reach the OpenAI-compatible model server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub host: String,
    pub port: u16,
    pub api_path: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Upper bound for a single completion call.
    pub request_timeout_secs: u64,
    /// Upper bound for the reachability probe.
    pub probe_timeout_secs: u64,
}

impl InferenceConfig {
    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.api_path)
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1234,
            api_path: "/v1/chat/completions".to_string(),
            model: "local-model".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            request_timeout_secs: 180,
            probe_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole chat turn as seen by the HTTP caller.
    pub relay_timeout_secs: u64,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            relay_timeout_secs: 240,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub file: String,
}

impl DatabaseConfig {
    /// sqlx connection URL, creating the file if missing.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.file)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file: "chat_database.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub password_min_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            password_min_length: 4,
        }
    }
}
