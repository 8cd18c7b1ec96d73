//! Settings store implementations.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use mailquill_protocols::Settings;

use crate::error::StoreError;

/// Async get/set persistence for the settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the full record. A missing or partial stored record still
    /// resolves to a usable value (read-time defaults).
    async fn get(&self) -> Result<Settings, StoreError>;

    /// Replace the stored record. Defaults are never applied here.
    async fn set(&self, settings: &Settings) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and the demo wiring.
pub struct MemoryStore {
    settings: tokio::sync::RwLock<Settings>,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: tokio::sync::RwLock::new(settings),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.read().await.clone())
    }

    async fn set(&self, settings: &Settings) -> Result<(), StoreError> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }
}

/// JSON-file-backed store.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn get(&self) -> Result<Settings, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path).await?;
        // serde defaults fill in any fields an older record lacks.
        Ok(serde_json::from_str(&content)?)
    }

    async fn set(&self, settings: &Settings) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
