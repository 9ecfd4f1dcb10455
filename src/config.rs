//! Configuration Management
//!
//! Handles persistent configuration storage for spectro-registry.

use crate::api::client::DEFAULT_HOST;
use crate::provider::DiskDefaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HOST_ENV: &str = "SPECTROCLOUD_HOST";
pub const PROJECT_UID_ENV: &str = "SPECTROCLOUD_PROJECT_UID";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Palette API host
    #[serde(default)]
    pub host: Option<String>,
    /// Project scope for API calls; tenant scope when unset
    #[serde(default)]
    pub project_uid: Option<String>,
    /// Machine pool disk settings used when a pool leaves them out
    #[serde(default)]
    pub disk_defaults: DiskDefaults,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("spectro-registry").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective host (CLI > config > SPECTROCLOUD_HOST > default)
    pub fn effective_host(&self) -> String {
        self.host
            .clone()
            .filter(|h| !h.is_empty())
            .or_else(|| std::env::var(HOST_ENV).ok().filter(|h| !h.is_empty()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    /// Get effective project UID (CLI > config > SPECTROCLOUD_PROJECT_UID)
    pub fn effective_project_uid(&self) -> Option<String> {
        self.project_uid
            .clone()
            .filter(|p| !p.is_empty())
            .or_else(|| std::env::var(PROJECT_UID_ENV).ok().filter(|p| !p.is_empty()))
    }
}
