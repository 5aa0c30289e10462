//! CLI command definitions and dispatch for the `lpilot` binary.
//!
//! Uses clap derive macros for argument parsing. Every command reads the
//! data directory (dataset, glossary, config, persisted index) and talks to
//! the configured embedding and generation services.

pub mod ask;
pub mod rebuild;
pub mod render;
pub mod search;
pub mod total;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use ledgerpilot_types::config::MAX_TOP_K;

/// Ask questions about your transaction ledger.
#[derive(Parser)]
#[command(name = "lpilot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logging (-v for debug, -vv for trace).
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Data directory (defaults to $LEDGERPILOT_DATA_DIR or ~/.ledgerpilot).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed the dataset and write a fresh vector index.
    Rebuild {
        /// Print paths, model and per-batch progress.
        #[arg(long)]
        verbose: bool,
    },

    /// Answer a question from the retrieved transactions.
    Ask {
        /// The question, in natural language.
        question: String,

        /// Also print the transactions the answer was grounded on.
        #[arg(long)]
        show_context: bool,

        /// Number of transactions to retrieve (defaults to retrieval.top_k).
        #[arg(short = 'k', long, value_parser = parse_top_k)]
        top_k: Option<usize>,
    },

    /// Show the transactions most similar to a query.
    Search {
        /// Free-text query.
        query: String,

        /// Number of results (defaults to retrieval.top_k).
        #[arg(short = 'k', long, value_parser = parse_top_k)]
        top_k: Option<usize>,
    },

    /// Sum signed amounts over the ledger.
    Total {
        /// First booking date to include (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last booking date to include (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only this category (case-insensitive).
        #[arg(long)]
        category: Option<String>,

        /// Only this transaction type (case-insensitive).
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Parse `-k`, accepting 1 through [`MAX_TOP_K`].
fn parse_top_k(raw: &str) -> Result<usize, String> {
    let k: usize = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a positive integer"))?;
    if (1..=MAX_TOP_K).contains(&k) {
        Ok(k)
    } else {
        Err(format!("must be between 1 and {MAX_TOP_K}"))
    }
}

/// Flags shared by every command's output.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
}

impl OutputMode {
    /// Whether styled, human-oriented output should be printed.
    pub fn styled(self) -> bool {
        !self.json && !self.quiet
    }
}
