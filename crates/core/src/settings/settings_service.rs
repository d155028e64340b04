use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};

use quotekeeper_providers::ProviderRegistry;

use crate::constants::{
    MIN_REFRESH_INTERVAL_SECS, SETTING_LAST_FETCHED_AT, SETTING_REFRESH_INTERVAL,
    SETTING_REFRESH_INTERVAL_OVERRIDE, SETTING_REQUIRES_NETWORK, SETTING_SELECTED_PROVIDER,
};
use crate::errors::Result;
use crate::scheduler::RefreshPolicy;
use crate::settings::settings_traits::SettingsRepositoryTrait;
use crate::settings::{AppSettings, SettingsUpdate};

/// Service trait for reading and mutating application settings.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<AppSettings>;

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()>;

    /// Build the refresh policy for the next scheduling decision.
    ///
    /// An interval below the 60 s floor is clamped and the clamped
    /// value is persisted back, so repeated calls converge.
    async fn refresh_policy(&self) -> Result<RefreshPolicy>;

    /// Select a quote provider, persisting the provider-derived policy
    /// fields (network requirement and interval override) with it.
    async fn select_provider(&self, provider_id: &str) -> Result<()>;

    /// When the last successful fetch completed, if ever.
    fn last_fetched_at(&self) -> Result<Option<DateTime<Utc>>>;
}

pub struct SettingsService {
    repository: Arc<dyn SettingsRepositoryTrait>,
    registry: Arc<ProviderRegistry>,
}

impl SettingsService {
    pub fn new(
        repository: Arc<dyn SettingsRepositoryTrait>,
        registry: Arc<ProviderRegistry>,
    ) -> Self {
        SettingsService {
            repository,
            registry,
        }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<AppSettings> {
        self.repository.get_settings()
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        self.repository.update_settings(update).await
    }

    async fn refresh_policy(&self) -> Result<RefreshPolicy> {
        let mut settings = self.repository.get_settings()?;

        if settings.refresh_interval_seconds < MIN_REFRESH_INTERVAL_SECS {
            warn!(
                "Refresh interval {} too short, clamping to {} seconds",
                settings.refresh_interval_seconds, MIN_REFRESH_INTERVAL_SECS
            );
            settings.refresh_interval_seconds = MIN_REFRESH_INTERVAL_SECS;
            self.repository
                .update_setting(
                    SETTING_REFRESH_INTERVAL,
                    &MIN_REFRESH_INTERVAL_SECS.to_string(),
                )
                .await?;
        }

        Ok(RefreshPolicy {
            interval_seconds: settings.refresh_interval_seconds,
            unmetered_only: settings.unmetered_only,
            requires_network: settings.requires_network,
            minimum_provider_interval: settings.refresh_interval_override,
        })
    }

    async fn select_provider(&self, provider_id: &str) -> Result<()> {
        let provider = self.registry.get(provider_id)?;

        debug!("Selecting quote provider: {}", provider.display_name());
        self.repository
            .update_setting(SETTING_SELECTED_PROVIDER, provider_id)
            .await?;
        self.repository
            .update_setting(
                SETTING_REQUIRES_NETWORK,
                &provider.requires_network().to_string(),
            )
            .await?;
        self.repository
            .update_setting(
                SETTING_REFRESH_INTERVAL_OVERRIDE,
                &provider.minimum_refresh_interval().to_string(),
            )
            .await?;
        Ok(())
    }

    fn last_fetched_at(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = self.repository.get_setting(SETTING_LAST_FETCHED_AT)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let millis: i64 = raw.parse().map_err(|_| {
            crate::errors::Error::InvalidConfigValue(format!(
                "{}: {}",
                SETTING_LAST_FETCHED_AT, raw
            ))
        })?;
        Ok(Utc.timestamp_millis_opt(millis).single())
    }
}
