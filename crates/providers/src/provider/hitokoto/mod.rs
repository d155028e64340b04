//! Hitokoto quote provider.
//!
//! Fetches a single sentence from the Hitokoto API
//! (<https://v1.hitokoto.cn>). The API takes one or more `c=` query
//! parameters selecting sentence categories (`a` = anime, `b` = comic,
//! `d` = literature, ...); with no selection we request category `a`,
//! matching the service default.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::QuoteData;
use crate::provider::{http_client, QuoteProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "hitokoto";

const API_BASE_URL: &str = "https://v1.hitokoto.cn/";

/// API response from Hitokoto.
#[derive(Debug, Deserialize)]
struct HitokotoResponse {
    hitokoto: String,
    from: Option<String>,
    #[serde(rename = "from_who")]
    from_who: Option<String>,
}

/// Hitokoto quote provider.
pub struct HitokotoProvider {
    client: Client,
    categories: Vec<String>,
}

impl HitokotoProvider {
    /// Create a provider requesting the given sentence categories.
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            client: http_client(),
            categories,
        }
    }

    fn request_url(&self) -> String {
        if self.categories.is_empty() {
            return format!("{}?c=a", API_BASE_URL);
        }
        let query = self
            .categories
            .iter()
            .map(|c| format!("c={}", c))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", API_BASE_URL, query)
    }
}

impl Default for HitokotoProvider {
    fn default() -> Self {
        Self::new(vec!["a".to_string()])
    }
}

#[async_trait]
impl QuoteProvider for HitokotoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Hitokoto"
    }

    async fn get_quote(&self) -> Result<QuoteData, ProviderError> {
        let url = self.request_url();
        debug!("Fetching quote from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        let body: HitokotoResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(PROVIDER_ID, e.to_string()))?;

        if body.hitokoto.trim().is_empty() {
            return Err(ProviderError::EmptyQuote(PROVIDER_ID.to_string()));
        }

        Ok(QuoteData {
            text: body.hitokoto,
            source: body.from.unwrap_or_default(),
            author: body.from_who.unwrap_or_default(),
        })
    }
}
