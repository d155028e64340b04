//! Quote provider implementations.

pub mod fortune;
pub mod freakuotes;
pub mod hitokoto;
mod traits;

pub use traits::QuoteProvider;

use std::time::Duration;

/// Default timeout for provider HTTP requests.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client shared by network-backed providers.
///
/// Providers must not block indefinitely, so every request carries a
/// hard timeout.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
}
