//! MobileZone CLI - Browse mobile phone prices with live market search.

use clap::Parser;
use mobilezone_cli::commands;
use mobilezone_cli::repl;
use mobilezone_cli::session::{build_session, load_catalogue};
use mobilezone_cli::{Cli, Command, Config, Formatter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr, RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> mobilezone_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    // Command-line flags win over the file
    if let Some(provider) = cli.provider {
        config.provider.kind = provider.into();
    }
    if let Some(catalogue) = cli.catalogue {
        config.catalogue = Some(catalogue);
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Some(Command::List(args)) => {
            let catalogue = load_catalogue(&config)?;
            commands::execute_list(args, &catalogue, &formatter)?;
        }
        Some(Command::Brands) => {
            let catalogue = load_catalogue(&config)?;
            commands::execute_brands(&catalogue, &formatter)?;
        }
        Some(Command::Show(args)) => {
            let catalogue = load_catalogue(&config)?;
            commands::execute_show(args, &catalogue, &formatter)?;
        }
        Some(Command::Search(args)) => {
            let catalogue = Arc::new(load_catalogue(&config)?);
            let mut session = build_session(&config, catalogue, cli.api_key)?;
            commands::execute_search(args, &mut session, &formatter).await?;
        }
        None | Some(Command::Repl) => {
            let catalogue = Arc::new(load_catalogue(&config)?);
            let mut session = build_session(&config, catalogue, cli.api_key)?;
            repl::run_repl(&mut session, &config, &formatter).await?;
        }
    }

    Ok(())
}
