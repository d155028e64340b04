//! Repository traits for settings.

use async_trait::async_trait;

use crate::errors::Result;
use crate::settings::{AppSettings, SettingsUpdate};

/// Repository trait for persisted configuration.
///
/// Keys are the abstract names from `constants`; values are stored as
/// strings under the store's own atomicity guarantees.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get all settings, with defaults for keys that were never written.
    fn get_settings(&self) -> Result<AppSettings>;

    /// Update multiple settings at once.
    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;

    /// Get a single raw value by key, or `None` if never written.
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>>;

    /// Write a single raw value.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;

    /// Remove a key entirely.
    async fn delete_setting(&self, setting_key: &str) -> Result<()>;
}
