use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::layers::transport::join_base_path;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ClientConfig {
    #[serde(default)]
    pub(crate) endpoint: EndpointConfig,
    #[serde(default)]
    pub(crate) form: FormConfig,
    #[serde(default)]
    pub(crate) ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct EndpointConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) path: String,
    pub(crate) connect_timeout_ms: u64,
    pub(crate) request_timeout_ms: Option<u64>,
}

impl EndpointConfig {
    pub(crate) fn url(&self) -> Result<String, String> {
        let base = format!("http://{}:{}", self.host.trim(), self.port);
        join_base_path(&base, &self.path)
    }

    pub(crate) fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub(crate) fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5001,
            path: "/predict".to_string(),
            connect_timeout_ms: 2_000,
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct FormConfig {
    pub(crate) require_all_fields: bool,
    pub(crate) fence_responses: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            require_all_fields: true,
            fence_responses: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct UiConfig {
    pub(crate) model_name: String,
    pub(crate) tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            model_name: "Logistic Regression".to_string(),
            tick_ms: 100,
        }
    }
}

pub(crate) fn validate_config(config: &ClientConfig) -> anyhow::Result<()> {
    let endpoint = &config.endpoint;
    if endpoint.host.trim().is_empty() {
        anyhow::bail!("endpoint.host must not be empty");
    }
    if endpoint.port == 0 {
        anyhow::bail!("endpoint.port must be non-zero");
    }
    if !endpoint.path.starts_with('/') {
        anyhow::bail!("endpoint.path must start with '/'");
    }
    if endpoint.request_timeout_ms == Some(0) {
        anyhow::bail!("endpoint.request_timeout_ms must be non-zero when set");
    }
    if !(10..=1_000).contains(&config.ui.tick_ms) {
        anyhow::bail!("ui.tick_ms must be between 10 and 1000");
    }
    Ok(())
}

/// Reads the config file; a missing file yields the built-in defaults.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<ClientConfig> {
    if !path.exists() {
        tracing::info!(config = %path.display(), "config file not found, using defaults");
        return Ok(ClientConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ClientConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}
