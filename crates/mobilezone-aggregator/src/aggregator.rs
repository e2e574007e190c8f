//! Core Search Aggregator implementation

use crate::config::AggregatorConfig;
use crate::normalize::normalize_reply;
use mobilezone_domain::traits::SearchProvider;
use mobilezone_domain::{SearchOutcome, SearchReport};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Current outcome plus the token of the latest submission
///
/// Both live under the same watch lock so issuing a token and applying a
/// result can never interleave.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchState {
    token: u64,
    outcome: SearchOutcome,
}

/// What a submission did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Query too short for a remote search; local results only
    LocalOnly,
    /// Remote search started under this token
    Dispatched {
        /// Request token; results from older tokens are discarded
        token: u64,
    },
}

/// Observer of the aggregator's outcome
pub struct OutcomeSubscription {
    rx: watch::Receiver<SearchState>,
}

impl OutcomeSubscription {
    /// Outcome right now
    pub fn current(&self) -> SearchOutcome {
        self.rx.borrow().outcome.clone()
    }

    /// Wait for the next outcome change
    ///
    /// Returns `None` once the aggregator and all its in-flight searches are
    /// gone.
    pub async fn changed(&mut self) -> Option<SearchOutcome> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().outcome.clone())
    }
}

/// The Search Aggregator layers remote generative search over local results
///
/// Every submission takes a fresh token. A provider result is applied only
/// if its token is still the latest, so a slow answer to an earlier query
/// never overwrites a newer one.
pub struct SearchAggregator<P>
where
    P: SearchProvider,
{
    provider: Arc<P>,
    config: Arc<AggregatorConfig>,
    state: Arc<watch::Sender<SearchState>>,
}

impl<P> Clone for SearchAggregator<P>
where
    P: SearchProvider,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
        }
    }
}

impl<P> SearchAggregator<P>
where
    P: SearchProvider + 'static,
    P::Error: Display,
{
    /// Create a new aggregator in the idle phase
    pub fn new(provider: P, config: AggregatorConfig) -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Self {
            provider: Arc::new(provider),
            config: Arc::new(config),
            state: Arc::new(tx),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether a query is long enough for a remote search
    pub fn qualifies(&self, query: &str) -> bool {
        query.chars().count() >= self.config.min_query_chars
    }

    /// Submit a query
    ///
    /// A qualifying query moves the outcome to pending and starts the
    /// provider call on the tokio runtime. Any other query resets the outcome
    /// to idle. Either way, in-flight calls are superseded.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, query: &str) -> Submission {
        if !self.qualifies(query) {
            debug!("Query '{}' is local-only", query);
            self.go_idle();
            return Submission::LocalOnly;
        }

        let query = query.to_string();
        let mut token = 0;
        self.state.send_modify(|state| {
            state.token += 1;
            token = state.token;
            state.outcome = SearchOutcome::Pending {
                query: query.clone(),
            };
        });

        info!("Dispatching remote search #{} for '{}'", token, query);

        let provider = Arc::clone(&self.provider);
        let config = Arc::clone(&self.config);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let report = run_search(provider.as_ref(), &config, &query).await;
            apply_result(&state, token, query, report);
        });

        Submission::Dispatched { token }
    }

    /// Submit a query and wait until this submission settles
    ///
    /// Returns the outcome current at that point. For a local-only query, or
    /// one superseded before it settled, that is whatever a later submission
    /// left behind.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let mut rx = self.state.subscribe();

        let token = match self.submit(query) {
            Submission::LocalOnly => return self.current(),
            Submission::Dispatched { token } => token,
        };

        loop {
            {
                let state = rx.borrow_and_update();
                if state.token != token || state.outcome.is_settled() {
                    return state.outcome.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.current();
            }
        }
    }

    /// Observe outcome changes
    pub fn subscribe(&self) -> OutcomeSubscription {
        OutcomeSubscription {
            rx: self.state.subscribe(),
        }
    }

    /// Outcome right now
    pub fn current(&self) -> SearchOutcome {
        self.state.borrow().outcome.clone()
    }

    /// Token of the latest submission
    pub fn latest_token(&self) -> u64 {
        self.state.borrow().token
    }

    /// Back to idle, superseding any in-flight call
    pub fn reset(&self) {
        self.go_idle();
    }

    fn go_idle(&self) {
        self.state.send_if_modified(|state| {
            state.token += 1;
            let changed = state.outcome != SearchOutcome::Idle;
            state.outcome = SearchOutcome::Idle;
            changed
        });
    }
}

/// Call the provider and fold every failure into the generic report
async fn run_search<P>(provider: &P, config: &AggregatorConfig, query: &str) -> SearchReport
where
    P: SearchProvider,
    P::Error: Display,
{
    let reply = match provider.search(query).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(
                "Search provider '{}' failed for '{}': {}",
                provider.name(),
                query,
                e
            );
            return SearchReport::failure(config.failure_message.clone());
        }
    };

    match normalize_reply(reply, config) {
        Ok(report) => report,
        Err(e) => {
            error!("Unusable reply from '{}' for '{}': {}", provider.name(), query, e);
            SearchReport::failure(config.failure_message.clone())
        }
    }
}

/// Settle the outcome unless a newer submission took over
fn apply_result(
    state: &watch::Sender<SearchState>,
    token: u64,
    query: String,
    report: SearchReport,
) {
    state.send_if_modified(|current| {
        if current.token != token {
            debug!(
                "Discarding superseded result #{} for '{}' (latest is #{})",
                token, query, current.token
            );
            return false;
        }

        info!(
            "Remote search #{} for '{}' settled with {} phones",
            token,
            query,
            report.phones.len()
        );
        current.outcome = SearchOutcome::Settled { query, report };
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilezone_llm::MockProvider;

    fn aggregator(provider: MockProvider) -> SearchAggregator<MockProvider> {
        SearchAggregator::new(provider, AggregatorConfig::default())
    }

    #[test]
    fn test_qualifies_counts_characters() {
        let agg = aggregator(MockProvider::default());
        assert!(!agg.qualifies(""));
        assert!(!agg.qualifies("ab"));
        assert!(agg.qualifies("abc"));
        // Two characters, more than two bytes
        assert!(!agg.qualifies("éé"));
        assert!(agg.qualifies("ééé"));
    }

    #[test]
    fn test_new_aggregator_is_idle() {
        let agg = aggregator(MockProvider::default());
        assert_eq!(agg.current(), SearchOutcome::Idle);
        assert_eq!(agg.latest_token(), 0);
    }

    #[tokio::test]
    async fn test_submit_moves_to_pending() {
        let agg = aggregator(MockProvider::default());

        let submission = agg.submit("galaxy");
        assert_eq!(submission, Submission::Dispatched { token: 1 });
        assert_eq!(
            agg.current(),
            SearchOutcome::Pending {
                query: "galaxy".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_local_only_bumps_token() {
        let agg = aggregator(MockProvider::default());

        assert_eq!(agg.submit("ab"), Submission::LocalOnly);
        assert_eq!(agg.latest_token(), 1);
        assert_eq!(agg.current(), SearchOutcome::Idle);
    }

    #[tokio::test]
    async fn test_search_settles() {
        let agg = aggregator(MockProvider::new(
            r#"{"summary": "ok", "phones": [{"name": "A", "brand": "B", "price": 1}]}"#,
        ));

        let outcome = agg.search("anything").await;
        assert!(outcome.is_settled());
        assert_eq!(outcome.query(), Some("anything"));
        assert_eq!(outcome.phones().len(), 1);
        assert_eq!(agg.current(), outcome);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let agg = aggregator(MockProvider::default());
        agg.search("something").await;
        assert!(agg.current().is_settled());

        agg.reset();
        assert_eq!(agg.current(), SearchOutcome::Idle);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let agg = aggregator(MockProvider::default());
        let other = agg.clone();

        agg.submit("shared");
        assert!(other.current().is_pending());
        assert_eq!(other.latest_token(), 1);
    }
}
