//! Client configuration loader.
//!
//! Reads `config.toml` from the config directory (`~/.consultant/` by
//! default) and deserializes it into [`ClientConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use consultant_types::config::ClientConfig;

/// Name of the config directory under the user's home.
const CONFIG_DIR_NAME: &str = ".consultant";

/// `~/.consultant`, or `./.consultant` when no home directory is known.
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Load client configuration from `{config_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Fields missing from the file take their default values.
pub async fn load_client_config(config_dir: &Path) -> ClientConfig {
    let config_path = config_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply a command-line or environment override of the backend URL.
pub fn with_backend_override(mut config: ClientConfig, backend_url: Option<&str>) -> ClientConfig {
    if let Some(url) = backend_url.map(str::trim).filter(|u| !u.is_empty()) {
        config.backend_url = url.trim_end_matches('/').to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.backend_url, "http://localhost:8000");
    }

    #[tokio::test]
    async fn partial_toml_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
backend_url = "https://consultant.example.edu"
connect_timeout_secs = 3
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.backend_url, "https://consultant.example.edu");
        assert_eq!(config.connect_timeout_secs, 3);
        assert_eq!(config.run_path, "/run_sse");
        assert_eq!(config.run_url(), "https://consultant.example.edu/run_sse");
    }

    #[tokio::test]
    async fn invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn backend_override() {
        let config = with_backend_override(ClientConfig::default(), Some("http://10.0.0.5:9000/"));
        assert_eq!(config.backend_url, "http://10.0.0.5:9000");

        let config = with_backend_override(ClientConfig::default(), Some("  "));
        assert_eq!(config.backend_url, "http://localhost:8000");

        let config = with_backend_override(ClientConfig::default(), None);
        assert_eq!(config.backend_url, "http://localhost:8000");
    }

    #[test]
    fn default_dir_name() {
        assert!(default_config_dir().ends_with(".consultant"));
    }
}
