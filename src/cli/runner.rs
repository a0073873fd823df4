//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ScholarConfig;
use crate::error::{Result, ResultExt};
use crate::pagination::{ResultSet, Searcher};
use crate::query::Query;
use crate::throttle::ThrottledQueue;
use std::fmt::Write as _;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Search { query, start } => {
                let searcher = Self::build_searcher(&config)?;
                let started = Instant::now();
                let set = searcher.search(&Query::with_start(query, *start)).await?;
                info!(
                    records = set.len(),
                    total = set.total,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Search complete"
                );
                self.output(&set)
            }
            Commands::All { query, max_pages } => {
                let mut searcher = Self::build_searcher(&config)?;
                if max_pages.is_some() {
                    searcher = searcher.with_max_pages(*max_pages);
                }
                let started = Instant::now();
                let set = searcher.search_all(&Query::new(query)).await?;
                info!(
                    records = set.len(),
                    total = set.total,
                    pages = set.pages_fetched,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Full search complete"
                );
                self.output(&set)
            }
            Commands::Config => {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        }
    }

    /// Load the config file, or the defaults when none was given
    fn load_config(&self) -> Result<ScholarConfig> {
        match &self.cli.config {
            Some(path) => ScholarConfig::from_file(path),
            None => Ok(ScholarConfig::default()),
        }
    }

    fn build_searcher(config: &ScholarConfig) -> Result<Searcher> {
        let queue = ThrottledQueue::new(&config.throttle)?;
        Searcher::from_config(config, queue)
    }

    /// Print a result set in the selected format
    fn output(&self, set: &ResultSet) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let json = serde_json::to_string(set).context("Failed to encode result set")?;
                println!("{json}");
            }
            OutputFormat::Pretty => print!("{}", render_pretty(set)),
        }
        Ok(())
    }
}

/// Human-readable listing of a result set
fn render_pretty(set: &ResultSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} of {} results", set.len(), set.total);

    for (index, record) in set.records.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>3}. {}", index + 1, record.title);
        if !record.authors.is_empty() {
            let names: Vec<&str> = record.authors.iter().map(|a| a.name.as_str()).collect();
            let _ = writeln!(out, "     {}", names.join(", "));
        }
        if !record.url.is_empty() {
            let _ = writeln!(out, "     {}", record.url);
        }
        if record.cited_count > 0 {
            let _ = writeln!(out, "     Cited by {}", record.cited_count);
        }
    }

    if let Some(url) = &set.next_url {
        let _ = writeln!(out);
        let _ = writeln!(out, "Next page: {url}");
    }
    out
}
