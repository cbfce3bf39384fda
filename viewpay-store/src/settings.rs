//! User preferences store.
//!
//! The settings collaborator: the persisted currency code picked by the
//! user, with change notification for the rate store to follow. The
//! settings UI writes through [`SettingsStore::set_currency_code`]; the
//! rate store subscribes and refreshes on every change.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Default wire-format currency code.
pub const DEFAULT_CURRENCY_CODE: &str = "usd";

// ============================================================================
// Settings
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected currency code, lowercase wire form (e.g. "usd", "eur").
    pub currency_code: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings, not yet persisted.
    pub fn new(path: PathBuf) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path, falling back to defaults when the
    /// file is missing or unreadable.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// The selected currency code, lowercase.
    pub async fn currency_code(&self) -> String {
        self.settings.read().await.currency_code.clone()
    }

    /// Sets the currency code, persists, and notifies subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written to disk; the
    /// in-memory value and the notification still go through, matching
    /// the stale-but-available policy everywhere else.
    pub async fn set_currency_code(&self, code: &str) -> Result<(), StoreError> {
        let code = code.trim().to_lowercase();
        {
            let mut settings = self.settings.write().await;
            if settings.currency_code == code {
                return Ok(());
            }
            settings.currency_code = code;
        }
        let saved = self.save().await;
        self.notify_change().await;
        saved
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults_to_usd() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await;
        assert_eq!(store.currency_code().await, "usd");
    }

    #[tokio::test]
    async fn test_set_persists_and_notifies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::load(path.clone()).await;
        let mut rx = store.subscribe();

        store.set_currency_code("EUR").await.unwrap();
        rx.changed().await.unwrap();

        // Lowercased on the way in, visible to a fresh load.
        let reloaded = SettingsStore::load(path).await;
        assert_eq!(reloaded.currency_code().await, "eur");
    }

    #[tokio::test]
    async fn test_setting_same_code_does_not_notify() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).await;
        let mut rx = store.subscribe();
        let before = *rx.borrow_and_update();

        store.set_currency_code("usd").await.unwrap();
        assert_eq!(*rx.borrow_and_update(), before);
    }
}
