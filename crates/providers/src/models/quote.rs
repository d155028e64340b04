use serde::{Deserialize, Serialize};

/// A quote as returned by a provider.
///
/// All fields default to the empty string; consumers never see a null
/// text or source. `source` names the work the quote is taken from and
/// `author` the person it is attributed to; providers fill whichever
/// of the two they know.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub text: String,
    pub source: String,
    pub author: String,
}

impl QuoteData {
    /// Create a quote with text and source, leaving the author empty.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        QuoteData {
            text: text.into(),
            source: source.into(),
            author: String::new(),
        }
    }

    /// Whether the quote carries no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Combined attribution line, joining source and author when both
    /// are present.
    pub fn attribution(&self) -> String {
        match (self.source.is_empty(), self.author.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.source.clone(),
            (true, false) => self.author.clone(),
            (false, false) => format!("{}, {}", self.author, self.source),
        }
    }
}
