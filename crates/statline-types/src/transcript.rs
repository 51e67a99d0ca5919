use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One parsed line of the host's newline-delimited JSON conversation log.
///
/// Only the fields the metrics engine consumes are modeled; everything else
/// on the line is ignored. Records missing a usage block or a timestamp are
/// still valid lines, they simply drop out of the computations that need
/// those fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<TranscriptMessage>,
    #[serde(default)]
    pub is_sidechain: bool,
    #[serde(default, rename = "isApiErrorMessage")]
    pub is_api_error: bool,
}

impl TranscriptRecord {
    /// Usage block, when the line carried one.
    pub fn usage(&self) -> Option<&TokenUsage> {
        self.message.as_ref().and_then(|m| m.usage.as_ref())
    }

    /// Timestamp parsed to UTC; `None` when absent or unparseable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptMessage {
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// Per-call token accounting as written by the provider.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default)]
    pub cache_read_input_tokens: Option<u64>,
}

impl TokenUsage {
    /// Context occupancy this call reported: fresh input plus everything
    /// written to or read from the prompt cache.
    pub fn context_tokens(&self) -> u64 {
        self.input_tokens
            + self.cache_creation_input_tokens.unwrap_or(0)
            + self.cache_read_input_tokens.unwrap_or(0)
    }
}
