//! Ledgerpilot CLI entry point.
//!
//! Binary name: `lpilot`
//!
//! Parses CLI arguments, sets up tracing, resolves the data directory and
//! configuration, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use ledgerpilot_observe::tracing_setup::{
    TracingOptions, init_tracing, shutdown_tracing, verbosity_filter,
};
use ledgerpilot_types::transaction::TotalsFilter;

use cli::{Cli, Commands, OutputMode};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions::new(verbosity_filter(cli.verbosity, cli.quiet))
        .with_otel(cli.otel)
        .with_json_logs(cli.json);
    if let Err(e) = init_tracing(&options) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "lpilot", &mut std::io::stdout());
        return Ok(());
    }

    let mode = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
    };
    let state = AppState::init(cli.data_dir).await?;

    match cli.command {
        Commands::Rebuild { verbose } => {
            cli::rebuild::rebuild(&state, verbose, mode).await?;
        }

        Commands::Ask {
            question,
            show_context,
            top_k,
        } => {
            cli::ask::ask(&state, &question, show_context, top_k, mode).await?;
        }

        Commands::Search { query, top_k } => {
            cli::search::search(&state, &query, top_k, mode).await?;
        }

        Commands::Total {
            from,
            to,
            category,
            kind,
        } => {
            let filter = TotalsFilter {
                start: from,
                end: to,
                category,
                kind,
            };
            cli::total::total(&state, filter, mode).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
