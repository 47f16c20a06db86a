//! Command-line arguments.

use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Global flags and the subcommand to run.
///
/// Flags given here override the configuration file.
#[derive(Debug, Parser)]
#[command(
    name = "gifstash",
    version,
    about = "Search Giphy and cache full resolution originals locally",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Giphy API key.
    #[arg(long, env = "GIPHY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Directory for cached originals.
    #[arg(long, value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Print one page of search results.
    Search {
        /// Search text.
        query: String,

        /// Index of the first result.
        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Number of results, defaults to the configured page size.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Download the original of one search result and print its local path.
    Fetch {
        /// Search text.
        query: String,

        /// Position of the result in the first page.
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Remove every cached original.
    Evict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_command() {
        let args = CliArgs::parse_from(["gifstash", "search", "funny cats", "--offset", "100"]);
        assert_eq!(
            args.command,
            Command::Search {
                query: "funny cats".to_string(),
                offset: 100,
                limit: None,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["gifstash", "fetch", "dogs", "--index", "3", "--timeout", "5"]);
        assert_eq!(args.timeout, Some(5));
        assert_eq!(
            args.command,
            Command::Fetch {
                query: "dogs".to_string(),
                index: 3,
            }
        );
    }
}
