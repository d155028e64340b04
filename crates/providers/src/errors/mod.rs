//! Error types for the providers crate.

use thiserror::Error;

/// Errors that can occur while fetching a quote or resolving a provider.
///
/// Every fetch failure is recovered upstream by the refresh pipeline's
/// back-off retry; none of these variants is fatal to the process.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A network error occurred while talking to the quote source.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The quote source answered with a non-success HTTP status.
    #[error("HTTP error ({status}): {provider}")]
    Http {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be parsed into a quote.
    #[error("Parse error: {provider} - {message}")]
    Parse {
        /// The provider whose response failed to parse
        provider: String,
        /// Description of the parse failure
        message: String,
    },

    /// The provider completed but produced no usable quote text.
    #[error("Provider returned an empty quote: {0}")]
    EmptyQuote(String),

    /// No provider is registered under the requested id.
    #[error("Provider not found: {0}")]
    NotFound(String),
}

impl ProviderError {
    /// Create a parse error for the given provider.
    pub fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ProviderError::NotFound("nope".to_string());
        assert_eq!(format!("{}", error), "Provider not found: nope");

        let error = ProviderError::Http {
            provider: "hitokoto".to_string(),
            status: 503,
        };
        assert_eq!(format!("{}", error), "HTTP error (503): hitokoto");

        let error = ProviderError::parse("freakuotes", "missing blockquote");
        assert_eq!(
            format!("{}", error),
            "Parse error: freakuotes - missing blockquote"
        );
    }
}
