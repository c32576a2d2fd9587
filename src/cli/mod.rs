//! CLI module for Herald.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::news::{EverythingParams, SourcesParams, TopHeadlinesParams};
use clap::{Args, Parser, Subcommand};

/// Herald - an LLM-routed news assistant
///
/// Ask about the news in plain language. Greetings get a friendly reply;
/// everything else is elaborated into an explicit intent and answered by an
/// agent that calls NewsAPI and the date helpers.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HERALD_CONFIG")]
    pub config: Option<String>,

    /// Print machine-readable JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file and check API keys
    Init,

    /// Check API keys, configuration and endpoints
    Doctor,

    /// Ask a single question
    Ask {
        /// The question or message
        query: String,

        /// Earlier conversation to take into account
        #[arg(long)]
        context: Option<String>,
    },

    /// Start an interactive chat session
    Chat {
        /// Number of recent exchanges passed along as context
        #[arg(long, default_value = "5")]
        history: usize,
    },

    /// Fetch top headlines directly (no LLM)
    Headlines(HeadlinesArgs),

    /// Search all articles directly (no LLM)
    Everything(EverythingArgs),

    /// List news sources directly (no LLM)
    Sources(SourcesArgs),

    /// Date helpers in the configured timezone
    Time {
        #[command(subcommand)]
        action: TimeAction,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Filters for `/top-headlines`.
#[derive(Args, Debug, Clone, Default)]
pub struct HeadlinesArgs {
    /// Keywords or phrase to search for
    #[arg(short, long)]
    pub q: Option<String>,

    /// Comma-separated source identifiers
    #[arg(long)]
    pub sources: Option<String>,

    /// Category (business, entertainment, general, health, science, sports, technology)
    #[arg(long)]
    pub category: Option<String>,

    /// Two-letter language code
    #[arg(short, long)]
    pub language: Option<String>,

    /// Two-letter country code
    #[arg(long)]
    pub country: Option<String>,

    /// Results per page (defaults to news.default_page_size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

impl From<&HeadlinesArgs> for TopHeadlinesParams {
    fn from(args: &HeadlinesArgs) -> Self {
        Self {
            q: args.q.clone(),
            sources: args.sources.clone(),
            category: args.category.clone(),
            language: args.language.clone(),
            country: args.country.clone(),
            page_size: args.page_size,
            page: args.page,
        }
    }
}

/// Filters for `/everything`.
#[derive(Args, Debug, Clone, Default)]
pub struct EverythingArgs {
    /// Keywords or phrase to search for
    pub q: Option<String>,

    /// Fields to search (title, description, content)
    #[arg(long)]
    pub search_in: Option<String>,

    /// Comma-separated source identifiers
    #[arg(long)]
    pub sources: Option<String>,

    /// Comma-separated domains to include
    #[arg(long)]
    pub domains: Option<String>,

    /// Comma-separated domains to exclude
    #[arg(long)]
    pub exclude_domains: Option<String>,

    /// Oldest article date (ISO 8601)
    #[arg(long)]
    pub from: Option<String>,

    /// Newest article date (ISO 8601)
    #[arg(long)]
    pub to: Option<String>,

    /// Two-letter language code
    #[arg(short, long)]
    pub language: Option<String>,

    /// Sort order (relevancy, popularity, publishedAt)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
}

impl From<&EverythingArgs> for EverythingParams {
    fn from(args: &EverythingArgs) -> Self {
        Self {
            q: args.q.clone(),
            search_in: args.search_in.clone(),
            sources: args.sources.clone(),
            domains: args.domains.clone(),
            exclude_domains: args.exclude_domains.clone(),
            from: args.from.clone(),
            to: args.to.clone(),
            language: args.language.clone(),
            sort_by: args.sort_by.clone(),
            page_size: args.page_size,
            page: args.page,
        }
    }
}

/// Filters for `/top-headlines/sources`.
#[derive(Args, Debug, Clone, Default)]
pub struct SourcesArgs {
    /// Category to filter by
    #[arg(long)]
    pub category: Option<String>,

    /// Two-letter language code
    #[arg(short, long)]
    pub language: Option<String>,

    /// Two-letter country code
    #[arg(long)]
    pub country: Option<String>,
}

impl From<&SourcesArgs> for SourcesParams {
    fn from(args: &SourcesArgs) -> Self {
        Self {
            category: args.category.clone(),
            language: args.language.clone(),
            country: args.country.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TimeAction {
    /// Today's date
    Today,

    /// Current year
    Year,

    /// Parse a date expression such as "next friday 5pm"
    Parse {
        /// Text to parse
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::QueryParams;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_headlines_args_map_to_params() {
        let cli = Cli::parse_from([
            "herald",
            "headlines",
            "--country",
            "us",
            "--category",
            "business",
            "--page-size",
            "3",
        ]);

        let Commands::Headlines(args) = cli.command else {
            panic!("expected headlines command");
        };
        let params = TopHeadlinesParams::from(&args);
        assert_eq!(
            params.query_pairs(),
            vec![
                ("category", "business".to_string()),
                ("country", "us".to_string()),
                ("pageSize", "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_time_parse_joins_words() {
        let cli = Cli::parse_from(["herald", "--json", "time", "parse", "next", "friday", "5pm"]);
        assert!(cli.json);
        match cli.command {
            Commands::Time {
                action: TimeAction::Parse { text },
            } => assert_eq!(text.join(" "), "next friday 5pm"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
