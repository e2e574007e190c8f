//! Browse session: the single owner of all mutable browsing state

use crate::aggregator::{OutcomeSubscription, SearchAggregator, Submission};
use mobilezone_catalogue::Catalogue;
use mobilezone_domain::traits::SearchProvider;
use mobilezone_domain::{BrandFacet, PhoneRecord, SearchOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Heading shown when neither a term nor a brand narrows the listing
pub const DEFAULT_HEADING: &str = "Latest Mobile Prices in Pakistan";

/// How listings are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Cards in a grid
    #[default]
    Grid,
    /// One listing per row
    List,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => write!(f, "grid"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

/// Browsing state over a catalogue plus remote search
///
/// Brand selection and the search term drive the local filter; the search
/// term also feeds the aggregator. Remote results are layered next to the
/// local ones, never merged into them.
pub struct BrowseSession<P>
where
    P: SearchProvider,
{
    catalogue: Arc<Catalogue>,
    aggregator: SearchAggregator<P>,
    brand: Option<String>,
    term: String,
    selected: Option<PhoneRecord>,
    view_mode: ViewMode,
}

impl<P> BrowseSession<P>
where
    P: SearchProvider + 'static,
    P::Error: Display,
{
    /// Create a session with nothing selected
    pub fn new(catalogue: Arc<Catalogue>, aggregator: SearchAggregator<P>) -> Self {
        Self {
            catalogue,
            aggregator,
            brand: None,
            term: String::new(),
            selected: None,
            view_mode: ViewMode::default(),
        }
    }

    /// The catalogue being browsed
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The aggregator behind the search box
    pub fn aggregator(&self) -> &SearchAggregator<P> {
        &self.aggregator
    }

    /// Select a brand; an empty name clears the selection
    pub fn select_brand(&mut self, brand: impl Into<String>) {
        let brand = brand.into();
        if brand.is_empty() {
            self.brand = None;
        } else {
            debug!("Brand selected: {}", brand);
            self.brand = Some(brand);
        }
    }

    /// Clear the brand selection
    pub fn clear_brand(&mut self) {
        self.brand = None;
    }

    /// Selected brand
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    /// Current search term
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Record a search term and hand it to the aggregator
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_search(&mut self, term: impl Into<String>) -> Submission {
        self.term = term.into();
        self.aggregator.submit(&self.term)
    }

    /// Record a search term and wait until its remote search settles
    pub async fn search(&mut self, term: impl Into<String>) -> SearchOutcome {
        self.term = term.into();
        self.aggregator.search(&self.term).await
    }

    /// Local listings matching the brand and term, in catalogue order
    pub fn local_results(&self) -> Vec<&PhoneRecord> {
        self.catalogue.filter(self.brand.as_deref(), Some(&self.term))
    }

    /// Current remote outcome
    pub fn outcome(&self) -> SearchOutcome {
        self.aggregator.current()
    }

    /// Observe remote outcome changes
    pub fn subscribe(&self) -> OutcomeSubscription {
        self.aggregator.subscribe()
    }

    /// Phones from the settled remote search, if any
    pub fn ai_phones(&self) -> Vec<PhoneRecord> {
        self.aggregator.current().phones().to_vec()
    }

    /// Local plus remote listing count
    pub fn total_shown(&self) -> usize {
        self.local_results().len() + self.aggregator.current().phones().len()
    }

    /// Title for the listing
    pub fn heading(&self) -> String {
        if !self.term.is_empty() {
            format!("Results for \"{}\"", self.term)
        } else if let Some(brand) = &self.brand {
            format!("{} Mobiles", brand)
        } else {
            DEFAULT_HEADING.to_string()
        }
    }

    /// Whether to show the "no phones found" state
    pub fn show_empty_state(&self) -> bool {
        let outcome = self.aggregator.current();
        self.local_results().is_empty() && !outcome.is_pending() && outcome.phones().is_empty()
    }

    /// Clear brand, term and the remote outcome
    pub fn reset(&mut self) {
        self.brand = None;
        self.term.clear();
        self.aggregator.reset();
    }

    /// Open the detail view for a listing, local first, then remote
    ///
    /// Returns the opened listing, or `None` if no listing has that id.
    pub fn open_details(&mut self, id: &str) -> Option<&PhoneRecord> {
        let phone = match self.catalogue.get(id) {
            Some(phone) => Some(phone.clone()),
            None => self
                .aggregator
                .current()
                .phones()
                .iter()
                .find(|p| p.id == id)
                .cloned(),
        };

        if phone.is_none() {
            debug!("No listing with id '{}'", id);
            return None;
        }
        self.selected = phone;
        self.selected.as_ref()
    }

    /// Close the detail view
    pub fn close_details(&mut self) {
        self.selected = None;
    }

    /// Listing shown in the detail view
    pub fn selected_phone(&self) -> Option<&PhoneRecord> {
        self.selected.as_ref()
    }

    /// Switch the listing layout
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Listing layout
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Brand facets with their static counts
    pub fn brands(&self) -> &[BrandFacet] {
        self.catalogue.brands()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AggregatorConfig;
    use mobilezone_llm::MockProvider;

    fn session(provider: MockProvider) -> BrowseSession<MockProvider> {
        let catalogue = Arc::new(Catalogue::builtin().unwrap());
        let aggregator = SearchAggregator::new(provider, AggregatorConfig::default());
        BrowseSession::new(catalogue, aggregator)
    }

    #[test]
    fn test_initial_state() {
        let s = session(MockProvider::default());
        assert_eq!(s.brand(), None);
        assert_eq!(s.term(), "");
        assert_eq!(s.view_mode(), ViewMode::Grid);
        assert_eq!(s.heading(), DEFAULT_HEADING);
        assert_eq!(s.local_results().len(), s.catalogue().len());
        assert!(!s.show_empty_state());
    }

    #[test]
    fn test_brand_selection() {
        let mut s = session(MockProvider::default());

        s.select_brand("Apple");
        assert_eq!(s.heading(), "Apple Mobiles");
        assert!(s.local_results().iter().all(|p| p.brand == "Apple"));

        s.select_brand("");
        assert_eq!(s.brand(), None);

        s.select_brand("Apple");
        s.clear_brand();
        assert_eq!(s.brand(), None);
    }

    #[test]
    fn test_short_term_stays_local() {
        tokio_test::block_on(async {
            let provider = MockProvider::default();
            let mut s = session(provider.clone());

            assert_eq!(s.submit_search("a5"), Submission::LocalOnly);
            assert_eq!(s.heading(), "Results for \"a5\"");
            assert_eq!(s.outcome(), SearchOutcome::Idle);
            assert_eq!(provider.call_count(), 0);
        });
    }

    #[test]
    fn test_unknown_brand_shows_empty_state() {
        let mut s = session(MockProvider::default());
        s.select_brand("Nokia");
        assert!(s.local_results().is_empty());
        assert!(s.show_empty_state());
    }

    #[test]
    fn test_view_mode_toggle() {
        let mut s = session(MockProvider::default());
        s.set_view_mode(ViewMode::List);
        assert_eq!(s.view_mode(), ViewMode::List);
        assert_eq!(ViewMode::List.to_string(), "list");
    }

    #[test]
    fn test_open_and_close_local_details() {
        let mut s = session(MockProvider::default());
        let id = s.catalogue().phones()[0].id.clone();

        let opened = s.open_details(&id).map(|p| p.id.clone());
        assert_eq!(opened.as_deref(), Some(id.as_str()));
        assert_eq!(s.selected_phone().map(|p| p.id.as_str()), Some(id.as_str()));

        s.close_details();
        assert!(s.selected_phone().is_none());
    }

    #[test]
    fn test_open_unknown_keeps_selection() {
        let mut s = session(MockProvider::default());
        let id = s.catalogue().phones()[0].id.clone();
        s.open_details(&id);

        assert!(s.open_details("missing").is_none());
        assert_eq!(s.selected_phone().map(|p| p.id.as_str()), Some(id.as_str()));
    }
}
