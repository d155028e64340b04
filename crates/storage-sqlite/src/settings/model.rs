use diesel::prelude::*;

/// A key/value settings row.
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::app_settings)]
pub struct AppSettingRow {
    pub setting_key: String,
    pub setting_value: String,
}
