//! Shared constants: intervals, job names and settings keys.

/// Default refresh interval when the user has not configured one.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u32 = 900;

/// Hard floor for the refresh interval. Anything below is clamped and
/// the clamped value is written back to configuration.
pub const MIN_REFRESH_INTERVAL_SECS: u32 = 60;

/// Name of the singleton refresh job. At most one job with this name
/// may be pending or running at any time.
pub const REFRESH_JOB_NAME: &str = "quote_refresh";

/// Well-known name of the store backup object on the remote store.
pub const SYNC_OBJECT_NAME: &str = "quotekeeper-store.json";

/// Step of the linear back-off applied when a refresh cycle requests a
/// retry.
pub const LINEAR_BACKOFF_STEP_MS: i64 = 2_000;

// Persisted configuration keys.
pub const SETTING_REFRESH_INTERVAL: &str = "refresh_interval_seconds";
pub const SETTING_REFRESH_INTERVAL_OVERRIDE: &str = "refresh_interval_override";
pub const SETTING_UNMETERED_ONLY: &str = "unmetered_only";
pub const SETTING_REQUIRES_NETWORK: &str = "requires_network";
pub const SETTING_SELECTED_PROVIDER: &str = "selected_provider";
pub const SETTING_LAST_FETCHED_AT: &str = "last_fetched_at";
pub const SETTING_QUOTE_TEXT: &str = "quote_text";
pub const SETTING_QUOTE_SOURCE: &str = "quote_source";
pub const SETTING_SYNC_ACCOUNT: &str = "sync_account";
pub const SETTING_SYNC_MARKER_HASH: &str = "sync_marker_hash";
pub const SETTING_SYNC_MARKER_TIMESTAMP: &str = "sync_marker_timestamp";

/// Default selected provider id.
pub const DEFAULT_PROVIDER_ID: &str = "hitokoto";
