//! Application state wiring the backend adapters together.
//!
//! AppState holds the resolved configuration and one shared reqwest client;
//! the chat driver, raw backend and upload client are built from it on
//! demand.

use std::path::PathBuf;

use consultant_core::chat::ChatDriver;
use consultant_infra::config::{default_config_dir, load_client_config, with_backend_override};
use consultant_infra::http::{HttpAgentBackend, HttpClient, UploadClient, build_client};
use consultant_types::config::ClientConfig;

/// Driver pinned to the HTTP backend.
pub type ConcreteChatDriver = ChatDriver<HttpAgentBackend>;

pub struct AppState {
    pub config: ClientConfig,
    client: HttpClient,
}

impl AppState {
    /// Resolve the config directory, load `config.toml` and apply the
    /// `--backend-url` override.
    pub async fn init(config_dir: Option<PathBuf>, backend_url: Option<&str>) -> anyhow::Result<Self> {
        let config_dir = config_dir.unwrap_or_else(default_config_dir);
        let config = with_backend_override(load_client_config(&config_dir).await, backend_url);
        let client = build_client(&config)?;

        tracing::debug!(backend = %config.backend_url, dir = %config_dir.display(), "configuration loaded");
        Ok(Self { config, client })
    }

    pub fn backend(&self) -> HttpAgentBackend {
        HttpAgentBackend::with_client(self.client.clone(), &self.config)
    }

    pub fn chat_driver(&self) -> ConcreteChatDriver {
        ChatDriver::new(self.backend())
    }

    pub fn upload_client(&self) -> UploadClient {
        UploadClient::with_client(self.client.clone(), &self.config)
    }
}
