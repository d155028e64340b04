use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PROVIDER_ID, DEFAULT_REFRESH_INTERVAL_SECS};

/// User-configurable settings that drive refresh scheduling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Seconds between automatic refreshes, as configured by the user.
    pub refresh_interval_seconds: u32,
    /// Provider-supplied minimum interval. 0 = no override,
    /// `u32::MAX` = never refresh automatically.
    pub refresh_interval_override: u32,
    /// Refresh only while on an unmetered network.
    pub unmetered_only: bool,
    /// Whether the selected provider needs network connectivity.
    pub requires_network: bool,
    /// Id of the currently selected quote provider.
    pub selected_provider: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECS,
            refresh_interval_override: 0,
            unmetered_only: false,
            requires_network: true,
            selected_provider: DEFAULT_PROVIDER_ID.to_string(),
        }
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub refresh_interval_seconds: Option<u32>,
    pub unmetered_only: Option<bool>,
}
