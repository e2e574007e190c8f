//! Runtime selection of the search provider.

use crate::config::{Config, ProviderKind, FALLBACK_API_KEY_ENV};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use mobilezone_domain::traits::{ProviderReply, SearchProvider};
use mobilezone_llm::{GeminiProvider, MockProvider, ProviderError};
use tracing::debug;

/// Provider chosen from configuration.
pub enum AnyProvider {
    /// Offline scripted provider
    Mock(MockProvider),
    /// Google Gemini
    Gemini(GeminiProvider),
}

impl AnyProvider {
    /// Build the configured provider.
    ///
    /// `api_key` overrides the key found in the environment.
    pub fn from_config(config: &Config, api_key: Option<String>) -> Result<Self> {
        match config.provider.kind {
            ProviderKind::Mock => {
                debug!("Using mock search provider");
                Ok(Self::Mock(MockProvider::default()))
            }
            ProviderKind::Gemini => {
                let key = api_key.or_else(|| config.api_key()).ok_or_else(|| {
                    CliError::Config(format!(
                        "No Gemini API key found. Set {} or {}, or use --provider mock",
                        config.provider.api_key_env, FALLBACK_API_KEY_ENV
                    ))
                })?;
                debug!("Using Gemini model {}", config.provider.gemini.model);
                let provider = GeminiProvider::from_config(config.provider.gemini.clone(), key)?;
                Ok(Self::Gemini(provider))
            }
        }
    }
}

#[async_trait]
impl SearchProvider for AnyProvider {
    type Error = ProviderError;

    async fn search(&self, query: &str) -> std::result::Result<ProviderReply, Self::Error> {
        match self {
            Self::Mock(provider) => provider.search(query).await,
            Self::Gemini(provider) => provider.search(query).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Mock(provider) => provider.name(),
            Self::Gemini(provider) => provider.name(),
        }
    }
}
