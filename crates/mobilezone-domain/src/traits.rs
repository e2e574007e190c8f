//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;

/// A source reference attached to a provider reply
///
/// Both parts are optional; providers pass through whatever metadata they
/// received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRef {
    /// Display title
    pub title: Option<String>,

    /// Source URI
    pub uri: Option<String>,
}

impl SourceRef {
    /// Create a source reference
    pub fn new(title: Option<String>, uri: Option<String>) -> Self {
        Self { title, uri }
    }
}

/// Payload assumed when a provider produced no text
pub const EMPTY_PAYLOAD: &str = r#"{"summary": "No data found.", "phones": []}"#;

/// Raw reply of the remote search capability
///
/// `text` holds the structured payload as JSON text:
/// `{ "summary": string, "phones": [{ "name", "brand", "price", ... }] }`.
/// It is loosely typed and must be normalized before use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderReply {
    /// Structured payload as JSON text, if the provider produced any
    pub text: Option<String>,

    /// Grounding sources
    pub sources: Vec<SourceRef>,
}

/// Trait for the remote generative-search capability
///
/// Implemented by the infrastructure layer (mobilezone-llm). Any concrete
/// provider (HTTP API, local model, stub) may implement it.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Error type for search operations
    type Error;

    /// Search for phones matching a free-text query
    async fn search(&self, query: &str) -> Result<ProviderReply, Self::Error>;

    /// Short provider name for logs
    fn name(&self) -> &str {
        "provider"
    }
}
