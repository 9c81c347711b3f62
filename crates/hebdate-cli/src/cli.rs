//! # CLI Structure and Argument Parsing
//!
//! `hebdate` with no subcommand shows today's Hebrew date; `show` does the
//! same explicitly. Cache maintenance lives under `cache`.
//!
//! ```bash
//! hebdate                      # text output
//! hebdate --format json        # machine-readable record
//! hebdate show --format html   # dashboard widget fragment
//! hebdate cache clear
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI structure for the `hebdate` command
#[derive(Parser, Clone, Debug)]
#[command(name = "hebdate")]
#[command(version)]
#[command(about = "hebdate - today's Hebrew date, holidays and events", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format for the date
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Ask the converter directly, neither reading nor writing the cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Icon shown next to the date in HTML output
    #[arg(long, value_name = "URL", global = true)]
    pub icon_url: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Directory containing config.toml. Also via `HEBDATE_CONFIG_DIR`.
    #[arg(
        long = "config-dir",
        global = true,
        value_name = "DIR",
        env = "HEBDATE_CONFIG_DIR"
    )]
    pub config_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Show today's Hebrew date (default)
    Show,

    /// Inspect or reset the lookup cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Print the effective configuration as TOML
    Config,
}

/// Cache maintenance
#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommand {
    /// Delete every cached lookup
    Clear,
    /// Print the cache directory
    Path,
}

/// Output formats for the date
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Hebrew text, transliteration and events for a terminal
    Text,
    /// The lookup record as JSON
    Json,
    /// Dashboard widget markup
    Html,
}
