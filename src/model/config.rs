use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::render::RendererKind;

/// Configuration from `.taskpad/config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage key the task list is written under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
        }
    }
}

/// Default: see src/templates/config.toml
fn default_storage_key() -> String {
    "todos".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// View used by `list` and at TUI startup when no state was saved
    #[serde(default)]
    pub renderer: RendererKind,
    #[serde(default)]
    pub show_key_hints: bool,
    /// Theme overrides, e.g. `text = "#FFFFFF"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
