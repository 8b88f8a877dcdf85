use crate::{
    domain::CardId,
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use tokio::fs;

/// Settings for the board synchronization layer, usually read from
/// `dragboard.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub endpoint: EndpointConfig,
    pub toast: ToastConfig,
    pub drag: DragPolicy,
}

impl SyncConfig {
    pub const FILE_NAME: &'static str = "dragboard.toml";

    /// Parses and validates a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SyncConfig =
            toml::from_str(contents).map_err(|e| BoardError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file at `path`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BoardError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint.validate()
    }
}

/// Where status updates are sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Path template; `{id}` is replaced by the card identifier
    pub path: String,
}

impl EndpointConfig {
    const ID_PLACEHOLDER: &'static str = "{id}";

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(BoardError::ConfigError(
                "endpoint.base_url must not be empty".to_string(),
            ));
        }
        if !self.path.contains(Self::ID_PLACEHOLDER) {
            return Err(BoardError::ConfigError(format!(
                "endpoint.path must contain {}: {}",
                Self::ID_PLACEHOLDER,
                self.path
            )));
        }
        Ok(())
    }

    /// Builds the status update URL for a card
    pub fn url_for(&self, card: &CardId) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.path.replace(Self::ID_PLACEHOLDER, card.as_str())
        )
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            path: "/requests/api/update-status/{id}".to_string(),
        }
    }
}

/// Timing of transient notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// How long a notice stays fully visible
    pub dwell_ms: u64,
    /// Length of the exit animation before removal
    pub exit_ms: u64,
}

impl ToastConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 3000,
            exit_ms: 300,
        }
    }
}

/// What the drag controller allows while a drop is still being confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragPolicy {
    /// Refuse new drags until the outstanding status update resolves
    pub block_while_pending: bool,
}

impl Default for DragPolicy {
    fn default() -> Self {
        Self {
            block_while_pending: true,
        }
    }
}
