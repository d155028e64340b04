mod model;
mod repository;

pub use model::AppSettingRow;
pub use repository::SettingsRepository;
