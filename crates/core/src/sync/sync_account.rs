//! Linked sync endpoint management.
//!
//! One endpoint (account) may be linked at a time. Linking, replacing
//! or unlinking an endpoint resets the sync marker to its empty/-1
//! state so the next pass falls into the bootstrap rule.

use std::sync::Arc;

use log::{debug, info};

use crate::constants::{
    SETTING_SYNC_ACCOUNT, SETTING_SYNC_MARKER_HASH, SETTING_SYNC_MARKER_TIMESTAMP,
};
use crate::errors::Result;
use crate::settings::SettingsRepositoryTrait;
use crate::sync::SyncMarker;

pub struct SyncAccountManager {
    settings: Arc<dyn SettingsRepositoryTrait>,
}

impl SyncAccountManager {
    pub fn new(settings: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SyncAccountManager { settings }
    }

    /// The currently linked account, if any.
    pub fn current_account(&self) -> Result<Option<String>> {
        Ok(self
            .settings
            .get_setting(SETTING_SYNC_ACCOUNT)?
            .filter(|name| !name.is_empty()))
    }

    /// Link an account, replacing any previously linked one.
    ///
    /// Re-linking the already linked account is a no-op; any other
    /// change clears the marker so the next pass bootstraps from the
    /// remote.
    pub async fn link_account(&self, name: &str) -> Result<()> {
        if let Some(current) = self.current_account()? {
            if current == name {
                debug!("Account {} is already linked", name);
                return Ok(());
            }
            info!("Replacing linked account {} with {}", current, name);
        } else {
            info!("Linking account {}", name);
        }
        self.settings
            .update_setting(SETTING_SYNC_ACCOUNT, name)
            .await?;
        self.clear_marker().await
    }

    /// Unlink the given account. Does nothing unless it is the one
    /// currently linked.
    pub async fn unlink_account(&self, name: &str) -> Result<()> {
        match self.current_account()? {
            Some(current) if current == name => {
                info!("Unlinking account {}", name);
                self.clear_marker().await?;
                self.settings.delete_setting(SETTING_SYNC_ACCOUNT).await
            }
            _ => Ok(()),
        }
    }

    /// The persisted sync marker for the linked endpoint.
    pub fn marker(&self) -> Result<SyncMarker> {
        let hash = self
            .settings
            .get_setting(SETTING_SYNC_MARKER_HASH)?
            .unwrap_or_default();
        let timestamp = self
            .settings
            .get_setting(SETTING_SYNC_MARKER_TIMESTAMP)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(-1);
        Ok(SyncMarker {
            last_known_remote_hash: hash,
            last_sync_timestamp: timestamp,
        })
    }

    /// Persist a confirmed baseline after a completed push or pull.
    pub async fn set_marker(&self, hash: &str, timestamp: i64) -> Result<()> {
        self.settings
            .update_setting(SETTING_SYNC_MARKER_HASH, hash)
            .await?;
        self.settings
            .update_setting(SETTING_SYNC_MARKER_TIMESTAMP, &timestamp.to_string())
            .await
    }

    /// Reset the marker to its never-synced state.
    pub async fn clear_marker(&self) -> Result<()> {
        debug!("Clearing sync marker");
        self.set_marker("", -1).await
    }
}
