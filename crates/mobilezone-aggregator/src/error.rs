//! Error types for the Search Aggregator

use thiserror::Error;

/// Errors that can occur while turning a provider reply into a report
///
/// None of these reach the presentation layer; the aggregator logs them and
/// settles with the generic failure message instead.
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// Reply text is not the expected payload shape
    #[error("Invalid payload format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for AggregatorError {
    fn from(e: serde_json::Error) -> Self {
        AggregatorError::JsonParse(e.to_string())
    }
}
