//! Configuration for the Search Aggregator

use serde::{Deserialize, Serialize};
use url::Url;

/// Message shown when the remote search fails for any reason
pub const FAILURE_MESSAGE: &str = "Error fetching live data. Please try again later.";

/// Summary used when the payload carries none
pub const DEFAULT_SUMMARY: &str = "Search complete.";

/// Configuration for the Search Aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Minimum query length, in characters, that triggers a remote search
    pub min_query_chars: usize,

    /// Currency label stamped on normalized listings
    pub currency: String,

    /// Base URL of the placeholder image service
    pub image_base: String,

    /// Placeholder image width
    pub image_width: u32,

    /// Placeholder image height
    pub image_height: u32,

    /// Rating given to normalized listings
    pub default_rating: f64,

    /// Release label given to normalized listings
    pub release_label: String,

    /// Summary used when the payload has none
    pub default_summary: String,

    /// User-facing message for a failed search
    pub failure_message: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 3,
            currency: "Rs.".to_string(),
            image_base: "https://picsum.photos/seed/".to_string(),
            image_width: 400,
            image_height: 500,
            default_rating: 4.0,
            release_label: "Recently".to_string(),
            default_summary: DEFAULT_SUMMARY.to_string(),
            failure_message: FAILURE_MESSAGE.to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Stamp listings with a catalogue's currency label
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_query_chars == 0 {
            return Err("min_query_chars must be greater than 0".to_string());
        }
        if !(0.0..=5.0).contains(&self.default_rating) {
            return Err("default_rating must be between 0 and 5".to_string());
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err("image dimensions must be greater than 0".to_string());
        }
        match Url::parse(&self.image_base) {
            Ok(url) if !url.cannot_be_a_base() => {}
            _ => return Err(format!("image_base '{}' is not a base URL", self.image_base)),
        }
        if self.failure_message.trim().is_empty() {
            return Err("failure_message must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
