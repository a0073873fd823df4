//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rate-limited Google Scholar search
#[derive(Parser, Debug)]
#[command(name = "scholar-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of results
    Search {
        /// Search text
        query: String,

        /// Offset of the first result
        #[arg(long, default_value = "0")]
        start: u32,
    },

    /// Fetch every page of results
    All {
        /// Search text
        query: String,

        /// Most follow-up pages to fetch (overrides the config file)
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The result set as a single JSON document
    Json,
    /// Human-readable listing
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["scholar-pager", "search", "deep learning", "--start", "20"]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Search { query, start } => {
                assert_eq!(query, "deep learning");
                assert_eq!(start, 20);
            }
            other => panic!("Expected Search, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_all_with_global_flags() {
        let cli = Cli::parse_from([
            "scholar-pager",
            "all",
            "rust",
            "--max-pages",
            "3",
            "--format",
            "pretty",
            "-v",
            "--config",
            "scholar.yaml",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.config, Some(PathBuf::from("scholar.yaml")));
        assert!(matches!(
            cli.command,
            Commands::All { max_pages: Some(3), .. }
        ));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["scholar-pager", "search"]).is_err());
    }
}
