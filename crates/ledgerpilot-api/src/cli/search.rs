//! `lpilot search`: ranked similarity search without generation.

use anyhow::Result;
use console::style;

use crate::cli::OutputMode;
use crate::cli::render::hits_table;
use crate::state::AppState;

pub async fn search(
    state: &AppState,
    query: &str,
    top_k: Option<usize>,
    mode: OutputMode,
) -> Result<()> {
    let copilot = state.copilot(top_k).await?;
    let outcome = copilot.search(query).await?;

    if mode.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    if mode.quiet {
        for hit in &outcome.hits {
            println!("{}\t{:.4}", hit.key, hit.score);
        }
        return Ok(());
    }

    println!();
    println!(
        "  Search for '{}'",
        style(query).white().bold(),
    );
    if outcome.rewritten != query {
        println!("  Rewritten:  {}", style(&outcome.rewritten).dim());
    }
    println!();

    if outcome.hits.is_empty() {
        println!("  {} No transactions matched.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!("{}", hits_table(&outcome.hits));
    println!();
    println!(
        "  {} result{}",
        style(outcome.hits.len()).bold(),
        if outcome.hits.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}
