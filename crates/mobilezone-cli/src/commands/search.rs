//! Search command implementation.

use crate::cli::SearchArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::{Formatter, SearchView};
use crate::provider::AnyProvider;
use mobilezone_aggregator::BrowseSession;

/// Execute the search command.
pub async fn execute_search(
    args: SearchArgs,
    session: &mut BrowseSession<AnyProvider>,
    formatter: &Formatter,
) -> Result<()> {
    if let Some(brand) = args.brand {
        session.select_brand(brand);
    }

    if !session.aggregator().qualifies(&args.query) && formatter.format() == OutputFormat::Table {
        eprintln!(
            "{}",
            formatter.info(&format!(
                "Live search needs at least {} characters; showing catalogue matches only",
                session.aggregator().config().min_query_chars
            ))
        );
    }

    session.search(args.query).await;
    println!("{}", formatter.format_search(&search_view(session))?);
    Ok(())
}

/// Snapshot of what the session currently shows.
pub fn search_view(session: &BrowseSession<AnyProvider>) -> SearchView<'_> {
    SearchView {
        heading: session.heading(),
        local: session.local_results(),
        outcome: session.outcome(),
        view_mode: session.view_mode(),
    }
}
