//! Catalogue loading and browse session setup.

use crate::config::Config;
use crate::error::Result;
use crate::provider::AnyProvider;
use mobilezone_aggregator::{BrowseSession, SearchAggregator};
use mobilezone_catalogue::Catalogue;
use std::sync::Arc;
use tracing::info;

/// Load the configured catalogue, or the built-in one.
pub fn load_catalogue(config: &Config) -> Result<Catalogue> {
    let catalogue = match &config.catalogue {
        Some(path) => {
            info!("Loading catalogue from {}", path.display());
            Catalogue::load(path)?
        }
        None => Catalogue::builtin()?,
    };
    Ok(catalogue)
}

/// Build a browse session over `catalogue` with the configured provider.
///
/// Remote listings are stamped with the catalogue's currency label.
pub fn build_session(
    config: &Config,
    catalogue: Arc<Catalogue>,
    api_key: Option<String>,
) -> Result<BrowseSession<AnyProvider>> {
    let provider = AnyProvider::from_config(config, api_key)?;
    let search_config = config.search.clone().with_currency(catalogue.currency());
    let aggregator = SearchAggregator::new(provider, search_config);
    Ok(BrowseSession::new(catalogue, aggregator))
}
