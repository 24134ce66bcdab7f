//! Sidebar settings

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings for the conversation sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidebarSettings {
    /// Collection holding conversation documents
    pub collection: String,
    /// Array field listing a conversation's participants
    pub participants_field: String,
    /// Path navigated to when the avatar is clicked
    pub home_path: String,
    pub search_placeholder: String,
    pub prompt_message: String,
    /// Shown for any rejected new-chat input
    pub invalid_email_notice: String,
}

impl Default for SidebarSettings {
    fn default() -> Self {
        Self {
            collection: "chats".to_string(),
            participants_field: "users".to_string(),
            home_path: "/".to_string(),
            search_placeholder: "Search in chat".to_string(),
            prompt_message: "Provide a email to start a conversation.".to_string(),
            invalid_email_notice: "Please enter a valid email!".to_string(),
        }
    }
}

impl SidebarSettings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let settings = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

/// Default location of the settings file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sidechat").join("settings.json"))
}
