//! Configuration loader for the Nova chat relay.
//!
//! Reads a TOML file into [`NovaConfig`]. Falls back to defaults when the
//! file is missing or malformed, so a bare binary still starts.

use std::path::Path;

use nova_types::config::NovaConfig;

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`NovaConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config(path: &Path) -> NovaConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return NovaConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return NovaConfig::default();
        }
    };

    match toml::from_str::<NovaConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            NovaConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("nova.toml")).await;
        assert_eq!(config.inference.port, 1234);
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nova.toml");
        tokio::fs::write(
            &path,
            r#"
[inference]
host = "10.0.0.5"
model = "mistral-7b"

[server]
port = 9000

[database]
file = "/var/lib/nova/chat.db"
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.inference.host, "10.0.0.5");
        assert_eq!(config.inference.model, "mistral-7b");
        assert_eq!(config.inference.port, 1234);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.file, "/var/lib/nova/chat.db");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nova.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.inference.model, "local-model");
    }
}
