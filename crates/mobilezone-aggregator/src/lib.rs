//! MobileZone Search Aggregator
//!
//! Layers a remote generative search over the local catalogue filter.
//!
//! # Overview
//!
//! A query longer than two characters starts a provider call in the
//! background. The reply is parsed, normalized into full `PhoneRecord`s and
//! published as the settled outcome, next to (never instead of) the local
//! filter results. Failures of any kind settle with a generic message; the
//! details only go to the log.
//!
//! # Architecture
//!
//! ```text
//! query → SearchAggregator → SearchProvider → parser → normalize → SearchOutcome
//!            │
//!            └─ token check: only the latest submission may settle
//! ```
//!
//! `BrowseSession` wraps the aggregator together with brand selection, the
//! detail view and the layout mode.
//!
//! # Example Usage
//!
//! ```
//! use mobilezone_aggregator::{AggregatorConfig, SearchAggregator};
//! use mobilezone_llm::MockProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new(
//!     r#"{"summary": "One match", "phones": [{"name": "Pixel 8", "brand": "Google", "price": 189999}]}"#,
//! );
//! let aggregator = SearchAggregator::new(provider, AggregatorConfig::default());
//!
//! let outcome = aggregator.search("pixel").await;
//! assert_eq!(outcome.phones()[0].currency, "Rs.");
//! # }
//! ```

#![warn(missing_docs)]

mod aggregator;
mod config;
mod error;
mod normalize;
mod parser;
mod session;

pub use aggregator::{OutcomeSubscription, SearchAggregator, Submission};
pub use config::{AggregatorConfig, DEFAULT_SUMMARY, FAILURE_MESSAGE};
pub use error::AggregatorError;
pub use normalize::{normalize_candidate, normalize_reply, placeholder_image};
pub use parser::{parse_payload, ParsedPayload, PhoneCandidate};
pub use session::{BrowseSession, ViewMode, DEFAULT_HEADING};
