//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MobileZone - Browse mobile phone prices with live market search.
#[derive(Debug, Parser)]
#[command(name = "mobilezone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Search provider to use
    #[arg(short, long, value_enum, global = true)]
    pub provider: Option<ProviderArg>,

    /// Gemini API key; overrides the variable named by `provider.api_key_env`
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Catalogue JSON file to browse instead of the built-in one
    #[arg(long, global = true)]
    pub catalogue: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// Search provider options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProviderArg {
    /// Offline provider that finds nothing
    Mock,
    /// Google Gemini with search grounding
    Gemini,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalogue phones, optionally filtered
    List(ListArgs),

    /// List brands with their listing counts
    Brands,

    /// Show full details of a phone
    Show(ShowArgs),

    /// Search the catalogue and the live market
    Search(SearchArgs),

    /// Show or initialize the configuration
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only phones of this brand (exact name)
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Only phones whose name or brand contains this text
    #[arg(short, long)]
    pub term: Option<String>,

    /// One compact line per phone instead of a table
    #[arg(short, long)]
    pub list: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Phone ID
    pub id: String,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Narrow local results to this brand
    #[arg(short, long)]
    pub brand: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ProviderArg> for crate::config::ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Mock => crate::config::ProviderKind::Mock,
            ProviderArg::Gemini => crate::config::ProviderKind::Gemini,
        }
    }
}
