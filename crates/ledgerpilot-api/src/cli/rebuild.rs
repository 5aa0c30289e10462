//! `lpilot rebuild`: embed the dataset and persist a fresh index.

use std::time::{Duration, Instant};

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use ledgerpilot_core::copilot::build_index;
use ledgerpilot_core::index::IndexStore;

use crate::cli::OutputMode;
use crate::state::AppState;

/// Build the index from the current dataset and write it atomically.
///
/// The previous index file stays in place if any step fails.
pub async fn rebuild(state: &AppState, verbose: bool, mode: OutputMode) -> Result<()> {
    let styled = mode.styled();
    let embeddings = state.embedding_client()?;
    let ledger = state.ledger().await?;

    if verbose && styled {
        println!();
        println!("  {}", style("── Paths ──").dim());
        println!("  Data dir: {}", style(state.data_dir.display()).dim());
        println!("  Dataset:  {}", style(state.layout.dataset.display()).dim());
        println!("  Index:    {}", style(state.layout.index.display()).dim());
        println!();
        println!("  {}", style("── Embedding ──").dim());
        println!("  Provider: {}", state.config.embedding.provider);
        println!("  Model:    {}", style(embeddings.model_name()).cyan());
        if let Some(base_url) = state
            .config
            .embedding
            .base_url
            .as_deref()
            .or(state.credentials.base_url.as_deref())
        {
            println!("  Endpoint: {}", style(base_url).dim());
        }
        println!(
            "  Batches:  {} x {} transactions",
            batch_count(ledger.len(), embeddings.batch_size()),
            embeddings.batch_size()
        );
        println!();
    }

    let spinner = ProgressBar::new_spinner();
    if styled {
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(format!("Embedding {} transactions...", ledger.len()));
        spinner.enable_steady_tick(Duration::from_millis(80));
    } else {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let started = Instant::now();
    let index = match build_index(&embeddings, &ledger).await {
        Ok(index) => index,
        Err(err) => {
            spinner.finish_and_clear();
            return Err(err.into());
        }
    };
    spinner.set_message("Writing index...");
    let saved = state.store.save(&state.layout.index, &index).await;
    spinner.finish_and_clear();
    saved?;

    let summary = index.summary();
    let elapsed = started.elapsed();

    if mode.json {
        let out = serde_json::json!({
            "path": state.layout.index.display().to_string(),
            "count": summary.count,
            "dimension": summary.dimension,
            "model": summary.model,
            "fingerprint": summary.fingerprint,
            "elapsed_ms": elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if mode.quiet {
        return Ok(());
    }

    println!();
    println!(
        "  {} Index rebuilt: {} vectors, dimension {}",
        style("✓").green().bold(),
        style(summary.count).bold(),
        summary.dimension
    );
    println!("  Model:       {}", style(&summary.model).cyan());
    println!(
        "  Fingerprint: {}",
        style(summary.fingerprint.get(..12).unwrap_or(&summary.fingerprint)).dim()
    );
    println!("  Wrote:       {}", style(state.layout.index.display()).dim());
    println!("  Took:        {:.1}s", elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn batch_count(items: usize, batch_size: usize) -> usize {
    items.div_ceil(batch_size.max(1))
}
