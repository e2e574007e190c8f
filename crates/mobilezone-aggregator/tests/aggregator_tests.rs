//! Integration tests for the Search Aggregator and Browse Session
//!
//! Provider timing is scripted with `MockProvider` delays under paused tokio
//! time, so out-of-order replies are reproduced deterministically.

use mobilezone_aggregator::{
    AggregatorConfig, BrowseSession, SearchAggregator, Submission, FAILURE_MESSAGE,
};
use mobilezone_catalogue::Catalogue;
use mobilezone_domain::traits::{ProviderReply, SourceRef};
use mobilezone_domain::SearchOutcome;
use mobilezone_llm::MockProvider;
use std::sync::Arc;
use std::time::Duration;

fn payload(summary: &str, names: &[&str]) -> String {
    let phones: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name, "brand": "Samsung", "price": 99999 }))
        .collect();
    serde_json::json!({ "summary": summary, "phones": phones }).to_string()
}

fn aggregator(provider: MockProvider) -> SearchAggregator<MockProvider> {
    SearchAggregator::new(provider, AggregatorConfig::default())
}

#[tokio::test]
async fn test_short_queries_never_call_provider() {
    let provider = MockProvider::default();
    let agg = aggregator(provider.clone());

    for query in ["", "a", "s2", "éé"] {
        let outcome = agg.search(query).await;
        assert_eq!(outcome, SearchOutcome::Idle);
    }
    tokio::task::yield_now().await;
    assert_eq!(provider.call_count(), 0);

    agg.search("s24").await;
    assert_eq!(provider.call_count(), 1);
    assert_eq!(provider.calls(), vec!["s24"]);
}

#[tokio::test]
async fn test_raw_query_reaches_provider() {
    let provider = MockProvider::default();
    let agg = aggregator(provider.clone());

    agg.search("  Galaxy S24 Ultra ").await;
    assert_eq!(provider.calls(), vec!["  Galaxy S24 Ultra "]);
}

#[tokio::test(start_paused = true)]
async fn test_later_query_wins_over_slow_earlier_one() {
    let mut provider = MockProvider::default();
    provider.add_response("first query", payload("first", &["Old Phone"]));
    provider.add_delay("first query", Duration::from_secs(5));
    provider.add_response("second query", payload("second", &["New Phone"]));
    provider.add_delay("second query", Duration::from_secs(1));
    let agg = aggregator(provider.clone());

    let first = agg.submit("first query");
    let outcome = agg.search("second query").await;

    assert_eq!(first, Submission::Dispatched { token: 1 });
    assert_eq!(outcome.query(), Some("second query"));
    assert_eq!(outcome.phones()[0].name, "New Phone");

    // Let the first reply arrive; it must be dropped
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(provider.call_count(), 2);
    assert_eq!(agg.current(), outcome);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_search_returns_newer_outcome() {
    let mut provider = MockProvider::default();
    provider.add_delay("slow query", Duration::from_secs(5));
    provider.add_response("fast query", payload("fast", &["Fast Phone"]));
    let agg = aggregator(provider);

    let waiter = {
        let agg = agg.clone();
        tokio::spawn(async move { agg.search("slow query").await })
    };
    tokio::task::yield_now().await;

    agg.search("fast query").await;
    let slow_outcome = waiter.await.unwrap();

    assert_eq!(slow_outcome.query(), Some("fast query"));
}

#[tokio::test(start_paused = true)]
async fn test_short_query_supersedes_in_flight_search() {
    let mut provider = MockProvider::default();
    provider.add_response("iphone", payload("apple", &["iPhone 15"]));
    provider.add_delay("iphone", Duration::from_secs(3));
    let agg = aggregator(provider);

    agg.submit("iphone");
    assert!(agg.current().is_pending());

    assert_eq!(agg.submit("ip"), Submission::LocalOnly);
    assert_eq!(agg.current(), SearchOutcome::Idle);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(agg.current(), SearchOutcome::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_reset_supersedes_in_flight_search() {
    let mut provider = MockProvider::default();
    provider.add_delay("pixel", Duration::from_secs(3));
    let agg = aggregator(provider);

    agg.submit("pixel");
    agg.reset();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(agg.current(), SearchOutcome::Idle);
}

#[tokio::test]
async fn test_provider_failure_settles_with_message() {
    let mut provider = MockProvider::default();
    provider.add_error("broken");
    let agg = aggregator(provider);

    let outcome = agg.search("broken").await;
    let report = outcome.report().unwrap();
    assert!(report.failed);
    assert_eq!(report.summary, FAILURE_MESSAGE);
    assert!(report.phones.is_empty());
    assert!(report.citations.is_empty());
}

#[tokio::test]
async fn test_malformed_reply_settles_with_message() {
    let mut provider = MockProvider::default();
    provider.add_reply(
        "garbled",
        ProviderReply {
            text: Some("I could not find anything, sorry!".to_string()),
            sources: vec![SourceRef::new(None, Some("https://x".to_string()))],
        },
    );
    let agg = aggregator(provider);

    let report = agg.search("garbled").await.report().cloned().unwrap();
    assert!(report.failed);
    assert!(!report.summary.is_empty());
    assert!(report.citations.is_empty());
}

#[tokio::test]
async fn test_subscription_sees_pending_then_settled() {
    let agg = aggregator(MockProvider::new(payload("done", &["Galaxy A55"])));
    let mut subscription = agg.subscribe();
    assert_eq!(subscription.current(), SearchOutcome::Idle);

    agg.submit("galaxy");
    let pending = subscription.changed().await.unwrap();
    assert!(pending.is_pending());

    let settled = subscription.changed().await.unwrap();
    assert!(settled.is_settled());
    assert_eq!(settled.report().unwrap().summary, "done");
}

#[tokio::test(start_paused = true)]
async fn test_session_layers_remote_results_next_to_local() {
    let mut provider = MockProvider::default();
    provider.add_response("galaxy", payload("Samsung", &["Galaxy S24 FE", "Galaxy Z Flip 6"]));
    provider.add_delay("galaxy", Duration::from_secs(2));
    let catalogue = Arc::new(Catalogue::builtin().unwrap());
    let mut session = BrowseSession::new(
        Arc::clone(&catalogue),
        SearchAggregator::new(provider, AggregatorConfig::default()),
    );

    session.submit_search("galaxy");
    let local = session.local_results().len();
    assert!(local > 0);
    assert!(session.outcome().is_pending());
    assert!(session.ai_phones().is_empty());
    assert_eq!(session.total_shown(), local);

    let mut subscription = session.subscribe();
    while !subscription.current().is_settled() {
        subscription.changed().await.unwrap();
    }

    assert_eq!(session.ai_phones().len(), 2);
    assert_eq!(session.total_shown(), local + 2);
    assert_eq!(session.local_results().len(), local);
    assert_eq!(session.heading(), "Results for \"galaxy\"");

    // Remote listings open in the detail view too
    let ai_id = session.ai_phones()[1].id.clone();
    let opened = session.open_details(&ai_id).map(|p| p.name.clone());
    assert_eq!(opened.as_deref(), Some("Galaxy Z Flip 6"));
}

#[tokio::test(start_paused = true)]
async fn test_new_query_clears_settled_results_immediately() {
    let mut provider = MockProvider::default();
    provider.add_response("galaxy", payload("Samsung", &["Galaxy S24 FE"]));
    provider.add_response("pixel", payload("Google", &["Pixel 9"]));
    provider.add_delay("pixel", Duration::from_secs(3));
    let mut session = BrowseSession::new(
        Arc::new(Catalogue::builtin().unwrap()),
        SearchAggregator::new(provider, AggregatorConfig::default()),
    );

    let settled = session.search("galaxy").await;
    assert!(settled.is_settled());
    assert_eq!(session.ai_phones().len(), 1);

    let submission = session.submit_search("pixel");
    assert!(matches!(submission, Submission::Dispatched { .. }));
    assert_eq!(
        session.aggregator().current(),
        SearchOutcome::Pending {
            query: "pixel".to_string()
        }
    );
    assert!(session.ai_phones().is_empty());
    assert_eq!(session.total_shown(), session.local_results().len());

    let outcome = session.search("pixel").await;
    assert_eq!(outcome.phones()[0].name, "Pixel 9");
}

#[tokio::test(start_paused = true)]
async fn test_session_stays_usable_while_search_is_pending() {
    let mut provider = MockProvider::default();
    provider.add_response("phone", payload("Slow", &["Remote Phone"]));
    provider.add_delay("phone", Duration::from_secs(30));
    let catalogue = Arc::new(Catalogue::builtin().unwrap());
    let mut session = BrowseSession::new(
        Arc::clone(&catalogue),
        SearchAggregator::new(provider, AggregatorConfig::default()),
    );

    session.submit_search("phone");
    assert!(session.outcome().is_pending());

    session.select_brand("Samsung");
    assert_eq!(session.brand(), Some("Samsung"));
    assert_eq!(session.heading(), "Results for \"phone\"");
    assert!(session
        .local_results()
        .iter()
        .all(|phone| phone.brand == "Samsung"));

    let first_id = catalogue.phones()[0].id.clone();
    assert!(session.open_details(&first_id).is_some());
    assert!(session.outcome().is_pending());

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(session.outcome().is_settled());
    assert_eq!(session.ai_phones()[0].name, "Remote Phone");
}

#[tokio::test]
async fn test_session_reset_clears_everything() {
    let provider = MockProvider::new(payload("x", &["Remote Phone"]));
    let catalogue = Arc::new(Catalogue::builtin().unwrap());
    let mut session = BrowseSession::new(
        Arc::clone(&catalogue),
        SearchAggregator::new(provider, AggregatorConfig::default()),
    );

    session.select_brand("Samsung");
    session.search("remote").await;
    assert_eq!(session.ai_phones().len(), 1);

    session.reset();
    assert_eq!(session.brand(), None);
    assert_eq!(session.term(), "");
    assert!(session.ai_phones().is_empty());
    assert_eq!(session.outcome(), SearchOutcome::Idle);
    assert_eq!(session.local_results().len(), catalogue.len());
}

#[tokio::test]
async fn test_empty_state_with_no_matches_anywhere() {
    let catalogue = Arc::new(Catalogue::builtin().unwrap());
    let mut session = BrowseSession::new(
        catalogue,
        SearchAggregator::new(MockProvider::default(), AggregatorConfig::default()),
    );

    session.search("zzzz unknown").await;
    assert!(session.local_results().is_empty());
    assert!(session.show_empty_state());
}

#[tokio::test]
async fn test_catalogue_currency_flows_into_remote_listings() {
    let catalogue = Catalogue::from_json(r#"{"currency": "PKR", "phones": []}"#).unwrap();
    let config = AggregatorConfig::default().with_currency(catalogue.currency());
    let agg = SearchAggregator::new(MockProvider::new(payload("x", &["A"])), config);

    let outcome = agg.search("anything").await;
    assert_eq!(outcome.phones()[0].currency, "PKR");
}
