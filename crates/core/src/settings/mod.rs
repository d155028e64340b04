//! Persisted application settings.

mod settings_model;
mod settings_service;
mod settings_traits;

pub use settings_model::{AppSettings, SettingsUpdate};
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::SettingsRepositoryTrait;
