use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use quotekeeper_core::constants::*;
use quotekeeper_core::errors::Result;
use quotekeeper_core::settings::{AppSettings, SettingsRepositoryTrait, SettingsUpdate};

use super::model::AppSettingRow;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

fn replace_setting(
    conn: &mut SqliteConnection,
    key: &str,
    value: String,
) -> std::result::Result<(), StorageError> {
    diesel::replace_into(app_settings)
        .values(&AppSettingRow {
            setting_key: key.to_string(),
            setting_value: value,
        })
        .execute(conn)?;
    Ok(())
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self) -> Result<AppSettings> {
        let mut conn = get_connection(&self.pool)?;
        let all_settings: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .map_err(|e| StorageError::from(e).into_core())?;

        let mut settings = AppSettings::default();

        for (key, value) in all_settings {
            match key.as_str() {
                SETTING_REFRESH_INTERVAL => {
                    settings.refresh_interval_seconds =
                        value.parse().unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
                }
                SETTING_REFRESH_INTERVAL_OVERRIDE => {
                    settings.refresh_interval_override = value.parse().unwrap_or(0);
                }
                SETTING_UNMETERED_ONLY => {
                    settings.unmetered_only = value.parse().unwrap_or(false);
                }
                SETTING_REQUIRES_NETWORK => {
                    settings.requires_network = value.parse().unwrap_or(true);
                }
                SETTING_SELECTED_PROVIDER => settings.selected_provider = value,
                _ => {} // Ignore unknown settings
            }
        }

        Ok(settings)
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<()> {
        let update = update.clone();
        self.writer
            .exec(move |conn| {
                if let Some(interval) = update.refresh_interval_seconds {
                    replace_setting(conn, SETTING_REFRESH_INTERVAL, interval.to_string())
                        .map_err(StorageError::into_core)?;
                }
                if let Some(unmetered_only) = update.unmetered_only {
                    replace_setting(conn, SETTING_UNMETERED_ONLY, unmetered_only.to_string())
                        .map_err(StorageError::into_core)?;
                }
                Ok(())
            })
            .await
    }

    fn get_setting(&self, key_param: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let result = app_settings
            .filter(setting_key.eq(key_param))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| StorageError::from(e).into_core())?;
        Ok(result)
    }

    async fn update_setting(&self, key_param: &str, value_param: &str) -> Result<()> {
        let key_param = key_param.to_string();
        let value_param = value_param.to_string();
        self.writer
            .exec(move |conn| {
                replace_setting(conn, &key_param, value_param).map_err(StorageError::into_core)
            })
            .await
    }

    async fn delete_setting(&self, key_param: &str) -> Result<()> {
        let key_param = key_param.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(app_settings.filter(setting_key.eq(&key_param)))
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into_core())?;
                Ok(())
            })
            .await
    }
}
