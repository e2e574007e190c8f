//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The REPL keeps one browse session alive, so brand selection, the search
//! term, live results and the detail view persist between commands. Live
//! searches run in the background; the prompt stays usable while they are
//! pending and a notice is printed once results arrive.

use crate::commands::search_view;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::provider::AnyProvider;
use mobilezone_aggregator::{BrowseSession, OutcomeSubscription, Submission, ViewMode};
use mobilezone_domain::SearchOutcome;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl(
    session: &mut BrowseSession<AnyProvider>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("MobileZone REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(|e| CliError::Io(std::io::Error::other(format!("Invalid history size: {}", e))))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(|e| {
        CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = match session.brand() {
            Some(brand) => format!("mobilezone [{}]> ", brand),
            None => "mobilezone> ".to_string(),
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, session, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    /// Search catalogue and live market
    Search(String),
    /// Select a brand, or clear it when `None`
    Brand(Option<String>),
    Brands,
    /// Redisplay the current results
    List,
    Show(String),
    Close,
    View(ViewMode),
    Reset,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "search" | "s" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: search <query>".to_string()));
            }
            Ok(ReplCommand::Search(rest.to_string()))
        }
        "brand" | "b" => Ok(ReplCommand::Brand(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "brands" => Ok(ReplCommand::Brands),
        "list" | "ls" => Ok(ReplCommand::List),
        "show" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: show <id>".to_string()));
            }
            Ok(ReplCommand::Show(rest.to_string()))
        }
        "close" => Ok(ReplCommand::Close),
        "view" => match rest {
            "grid" => Ok(ReplCommand::View(ViewMode::Grid)),
            "list" => Ok(ReplCommand::View(ViewMode::List)),
            _ => Err(CliError::InvalidInput("Usage: view <grid|list>".to_string())),
        },
        "reset" => Ok(ReplCommand::Reset),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            head
        ))),
    }
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: ReplCommand,
    session: &mut BrowseSession<AnyProvider>,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        ReplCommand::Search(query) => {
            if let Submission::Dispatched { .. } = session.submit_search(query.clone()) {
                let notice = formatter.success(&format!(
                    "Live results for \"{}\" are ready. Type 'list' to see them.",
                    query
                ));
                let subscription = session.subscribe();
                tokio::spawn(async move {
                    if await_settlement(subscription, &query).await.is_some() {
                        println!("\n{}", notice);
                    }
                });
            }
            println!("{}", formatter.format_search(&search_view(session))?);
        }
        ReplCommand::Brand(brand) => {
            match brand {
                Some(name) => {
                    if !session.catalogue().has_brand(&name) {
                        println!(
                            "{}",
                            formatter.warning(&format!("'{}' is not a known brand", name))
                        );
                    }
                    session.select_brand(name);
                }
                None => session.clear_brand(),
            }
            println!("{}", formatter.format_search(&search_view(session))?);
        }
        ReplCommand::Brands => {
            println!("{}", formatter.format_brands(session.brands())?);
        }
        ReplCommand::List => {
            println!("{}", formatter.format_search(&search_view(session))?);
        }
        ReplCommand::Show(id) => {
            let phone = session
                .open_details(&id)
                .ok_or_else(|| CliError::NotFound(id.clone()))?;
            println!("{}", formatter.format_phone_detail(phone)?);
        }
        ReplCommand::Close => {
            session.close_details();
        }
        ReplCommand::View(mode) => {
            session.set_view_mode(mode);
            println!("{}", formatter.success(&format!("View mode: {}", mode)));
        }
        ReplCommand::Reset => {
            session.reset();
            println!("{}", formatter.success("Filters reset"));
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

/// Wait for the live search of `query` to settle.
///
/// Returns `None` when a later submission supersedes it first.
async fn await_settlement(
    mut subscription: OutcomeSubscription,
    query: &str,
) -> Option<SearchOutcome> {
    let mut outcome = subscription.current();
    loop {
        match &outcome {
            SearchOutcome::Settled { query: settled, .. } if settled == query => {
                return Some(outcome);
            }
            SearchOutcome::Pending { query: pending } if pending == query => {}
            _ => return None,
        }
        outcome = subscription.changed().await?;
    }
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let app_dir = home.join(".mobilezone");
    std::fs::create_dir_all(&app_dir)?;
    Ok(app_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  search <query>       - Search catalogue; live market results (3+ chars) arrive in the background");
    println!("  brand [name]         - Select a brand, or clear it with no name");
    println!("  brands               - List brands");
    println!("  list                 - Show current results");
    println!("  show <id>            - Show phone details (catalogue or live result)");
    println!("  close                - Close the detail view");
    println!("  view <grid|list>     - Switch listing layout");
    println!("  reset                - Reset all filters");
    println!("  help, ?              - Show this help");
    println!("  exit, quit, q        - Exit REPL");
    println!();
}
