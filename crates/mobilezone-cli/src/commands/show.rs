//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use mobilezone_catalogue::Catalogue;
use mobilezone_domain::phone::SYNTHESIZED_ID_PREFIX;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, catalogue: &Catalogue, formatter: &Formatter) -> Result<()> {
    let phone = catalogue.get(&args.id).ok_or_else(|| {
        if args.id.starts_with(SYNTHESIZED_ID_PREFIX) {
            CliError::InvalidInput(format!(
                "'{}' is a live search result; open it with 'show' inside the REPL session that found it",
                args.id
            ))
        } else {
            CliError::NotFound(args.id.clone())
        }
    })?;

    println!("{}", formatter.format_phone_detail(phone)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    #[test]
    fn test_show_known_phone() {
        let catalogue = Catalogue::builtin().unwrap();
        let id = catalogue.phones()[0].id.clone();
        assert!(execute_show(ShowArgs { id }, &catalogue, &formatter()).is_ok());
    }

    #[test]
    fn test_show_unknown_phone() {
        let catalogue = Catalogue::builtin().unwrap();
        let result = execute_show(ShowArgs { id: "999".to_string() }, &catalogue, &formatter());
        assert!(matches!(result, Err(CliError::NotFound(id)) if id == "999"));
    }

    #[test]
    fn test_show_remote_id_outside_session() {
        let catalogue = Catalogue::builtin().unwrap();
        let result = execute_show(ShowArgs { id: "ai-0-abc".to_string() }, &catalogue, &formatter());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
