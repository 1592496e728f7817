//! User configuration consumed by the explorer
//!
//! Settings are read through [`ExplorerSettings`] on every operation that
//! needs them, never copied into the resolver, so a change takes effect on
//! the next `get_children` call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};

/// Record kinds shown when the user has not configured any.
pub const DEFAULT_RECORD_TYPES: [&str; 5] = ["A", "AAAA", "CNAME", "MX", "TXT"];

/// Explorer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExplorerConfig {
    /// Allow-list of record type strings shown under a zone, in user order
    pub record_types: Vec<String>,
    /// Whether zones are annotated with their record count
    pub show_record_count: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            record_types: DEFAULT_RECORD_TYPES.iter().map(ToString::to_string).collect(),
            show_record_count: true,
        }
    }
}

/// Read-only view of the current user configuration.
#[async_trait]
pub trait ExplorerSettings: Send + Sync {
    /// Record type allow-list.
    async fn record_types(&self) -> Vec<String>;

    /// Whether to fetch and display per-zone record counts.
    async fn show_record_count(&self) -> bool;
}

/// In-memory settings that the host updates when the user edits them.
#[derive(Debug, Default)]
pub struct SharedSettings {
    config: RwLock<ExplorerConfig>,
}

impl SharedSettings {
    #[must_use]
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Parse a settings object; missing keys fall back to defaults.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: ExplorerConfig = serde_json::from_str(json)
            .map_err(|e| CoreError::ConfigError(format!("invalid explorer settings: {e}")))?;
        Ok(Self::new(config))
    }

    /// Replace the whole configuration.
    pub async fn update(&self, config: ExplorerConfig) {
        log::debug!(
            "Explorer settings updated: types={:?}, show_record_count={}",
            config.record_types,
            config.show_record_count
        );
        *self.config.write().await = config;
    }

    pub async fn snapshot(&self) -> ExplorerConfig {
        self.config.read().await.clone()
    }
}

#[async_trait]
impl ExplorerSettings for SharedSettings {
    async fn record_types(&self) -> Vec<String> {
        self.config.read().await.record_types.clone()
    }

    async fn show_record_count(&self) -> bool {
        self.config.read().await.show_record_count
    }
}
