//! List command implementation.

use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::Formatter;
use mobilezone_aggregator::ViewMode;
use mobilezone_catalogue::Catalogue;

/// Execute the list command.
pub fn execute_list(args: ListArgs, catalogue: &Catalogue, formatter: &Formatter) -> Result<()> {
    if let Some(brand) = args.brand.as_deref() {
        if !brand.is_empty() && !catalogue.has_brand(brand) {
            eprintln!(
                "{}",
                formatter.warning(&format!("'{}' is not a known brand (names are case-sensitive)", brand))
            );
        }
    }

    let phones = catalogue.filter(args.brand.as_deref(), args.term.as_deref());
    let view_mode = if args.list { ViewMode::List } else { ViewMode::Grid };

    println!("{}", formatter.format_phones(&phones, view_mode)?);
    Ok(())
}
