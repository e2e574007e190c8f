//! MobileZone Search Provider Layer
//!
//! Pluggable generative-search providers behind the `SearchProvider` trait
//! from `mobilezone-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing and offline use
//! - `GeminiProvider`: Google Gemini `generateContent` API with search grounding
//!
//! # Examples
//!
//! ```
//! use mobilezone_llm::MockProvider;
//! use mobilezone_domain::traits::SearchProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new(r#"{"summary": "Nothing yet", "phones": []}"#);
//! let reply = provider.search("pixel 8").await.unwrap();
//! assert!(reply.text.unwrap().contains("Nothing yet"));
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use async_trait::async_trait;
use mobilezone_domain::traits::{ProviderReply, SearchProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiProvider};

pub use mobilezone_domain::traits::EMPTY_PAYLOAD;

/// Errors that can occur during search provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing or rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Provider misconfigured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// What the mock does for a given query
#[derive(Debug, Clone)]
enum Script {
    Reply(ProviderReply),
    Error(String),
}

/// Mock search provider for deterministic testing
///
/// Returns pre-configured replies without making any network calls. Replies
/// can be delayed per query to reproduce slow or out-of-order responses.
///
/// # Examples
///
/// ```
/// use mobilezone_llm::MockProvider;
/// use std::time::Duration;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("iphone 15", r#"{"summary": "Apple", "phones": []}"#);
/// provider.add_error("broken query");
/// provider.add_delay("iphone 15", Duration::from_millis(50));
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: ProviderReply,
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed reply text for all queries
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_reply(ProviderReply {
            text: Some(text.into()),
            sources: Vec::new(),
        })
    }

    /// Create a new MockProvider with a fixed full reply for all queries
    pub fn with_reply(reply: ProviderReply) -> Self {
        Self {
            default_reply: reply,
            scripts: Arc::new(Mutex::new(HashMap::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a specific reply text for a given query
    pub fn add_response(&mut self, query: impl Into<String>, text: impl Into<String>) {
        self.add_reply(
            query,
            ProviderReply {
                text: Some(text.into()),
                sources: Vec::new(),
            },
        );
    }

    /// Add a specific full reply for a given query
    pub fn add_reply(&mut self, query: impl Into<String>, reply: ProviderReply) {
        lock(&self.scripts).insert(query.into(), Script::Reply(reply));
    }

    /// Configure to return an error for a specific query
    pub fn add_error(&mut self, query: impl Into<String>) {
        lock(&self.scripts).insert(query.into(), Script::Error("Mock error".to_string()));
    }

    /// Delay the reply for a specific query
    pub fn add_delay(&mut self, query: impl Into<String>, delay: Duration) {
        lock(&self.delays).insert(query.into(), delay);
    }

    /// Get the number of times search was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Queries received so far, in call order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Reset the call count and the recorded queries
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        lock(&self.calls).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(EMPTY_PAYLOAD)
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    type Error = ProviderError;

    async fn search(&self, query: &str) -> Result<ProviderReply, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.calls).push(query.to_string());

        let delay = lock(&self.delays).get(query).copied();
        let script = lock(&self.scripts).get(query).cloned();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match script {
            Some(Script::Reply(reply)) => Ok(reply),
            Some(Script::Error(message)) => Err(ProviderError::Other(message)),
            None => Ok(self.default_reply.clone()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Lock a mutex, recovering the data if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
