//! Brands command implementation.

use crate::error::Result;
use crate::output::Formatter;
use mobilezone_catalogue::Catalogue;

/// Execute the brands command.
pub fn execute_brands(catalogue: &Catalogue, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_brands(catalogue.brands())?);
    Ok(())
}
