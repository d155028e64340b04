//! Freakuotes quote provider.
//!
//! Scrapes a random quote from <https://freakuotes.com>. The page
//! renders the quote as a `blockquote` inside `.quote-container`, with
//! the attribution split between a `footer > span` (speaker) and a
//! `footer > cite` title attribute (work).

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::errors::ProviderError;
use crate::models::QuoteData;
use crate::provider::{http_client, QuoteProvider};

/// Provider ID constant
const PROVIDER_ID: &str = "freakuotes";

const RANDOM_QUOTE_URL: &str = "https://freakuotes.com/frase/aleatoria";

/// Freakuotes quote provider.
pub struct FreakuotesProvider {
    client: Client,
}

impl FreakuotesProvider {
    pub fn new() -> Self {
        Self {
            client: http_client(),
        }
    }

    /// Extract the quote from a fetched page.
    fn parse_page(html: &str) -> Result<QuoteData, ProviderError> {
        let document = Html::parse_document(html);
        let blockquote_sel = Selector::parse(".quote-container > blockquote").unwrap();
        let text_sel = Selector::parse("p").unwrap();
        let span_sel = Selector::parse("footer > span").unwrap();
        let cite_sel = Selector::parse("footer > cite").unwrap();

        let blockquote = document
            .select(&blockquote_sel)
            .next()
            .ok_or_else(|| ProviderError::parse(PROVIDER_ID, "quote container not found"))?;

        let text = blockquote
            .select(&text_sel)
            .next()
            .map(|p| p.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::EmptyQuote(PROVIDER_ID.to_string()));
        }

        let source_left = blockquote
            .select(&span_sel)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let source_right = blockquote
            .select(&cite_sel)
            .next()
            .and_then(|c| c.value().attr("title"))
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let source = match (source_left.is_empty(), source_right.is_empty()) {
            (true, true) => {
                warn!("Quote source not found");
                String::new()
            }
            (true, false) => source_right,
            (false, true) => source_left,
            (false, false) => format!("{}, {}", source_left, source_right),
        };

        Ok(QuoteData::new(text, source))
    }
}

impl Default for FreakuotesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for FreakuotesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Freakuotes"
    }

    async fn get_quote(&self) -> Result<QuoteData, ProviderError> {
        debug!("Fetching quote from {}", RANDOM_QUOTE_URL);

        let response = self.client.get(RANDOM_QUOTE_URL).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        Self::parse_page(&html)
    }
}
