use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the postdeck binary.
#[derive(Debug, Parser)]
#[command(
    name = "postdeck",
    version,
    about = "List and search posts on a blog read API"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTDECK_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print one page of the default post listing.
    List(ListArgs),
    /// Print the posts filed under a keyword.
    Keyword(KeywordArgs),
    /// Read queries from stdin, one per line, and print the settled search result.
    Search,
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Page to fetch, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Debug, Args, Clone)]
pub struct KeywordArgs {
    pub keyword: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchModeArg {
    Title,
    Keyword,
}

impl SearchModeArg {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SearchModeArg::Title => "title",
            SearchModeArg::Keyword => "keyword",
        }
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the base URL of the blog read API.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the per-request timeout in seconds.
    #[arg(long = "api-timeout-seconds", value_name = "SECONDS", global = true)]
    pub api_timeout_seconds: Option<u64>,

    /// Override the search quiet period in milliseconds.
    #[arg(long = "search-quiet-period-ms", value_name = "MILLIS", global = true)]
    pub search_quiet_period_ms: Option<u64>,

    /// Override which endpoint debounced searches hit.
    #[arg(long = "search-mode", value_enum, global = true)]
    pub search_mode: Option<SearchModeArg>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
