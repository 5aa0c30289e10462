//! `lpilot total`: sum signed amounts over the ledger.

use anyhow::{Result, bail};
use console::style;

use ledgerpilot_types::transaction::TotalsFilter;

use crate::cli::OutputMode;
use crate::cli::render::format_amount;
use crate::state::AppState;

pub async fn total(state: &AppState, filter: TotalsFilter, mode: OutputMode) -> Result<()> {
    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        if start > end {
            bail!("--from {start} is after --to {end}");
        }
    }

    let ledger = state.ledger().await?;
    let result = ledger.total(&filter);

    if mode.json {
        let out = serde_json::json!({
            "filter": filter,
            "total": result.total,
            "matched": result.matched,
            "currency": result.currency,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if mode.quiet {
        println!("{:.2}", result.total);
        return Ok(());
    }

    let color = if result.total < 0.0 {
        style(format_amount(Some(result.total), &result.currency)).red()
    } else {
        style(format_amount(Some(result.total), &result.currency)).green()
    };

    println!();
    println!("  {} {}", style("Total:").bold(), color.bold());
    println!(
        "  {} transaction{} matched",
        style(result.matched).bold(),
        if result.matched == 1 { "" } else { "s" }
    );
    if let Some(desc) = describe(&filter) {
        println!("  {}", style(desc).dim());
    }
    println!();
    Ok(())
}

/// One-line description of the active filters, if any.
fn describe(filter: &TotalsFilter) -> Option<String> {
    let mut parts = Vec::new();
    match (filter.start, filter.end) {
        (Some(s), Some(e)) => parts.push(format!("from {s} to {e}")),
        (Some(s), None) => parts.push(format!("from {s}")),
        (None, Some(e)) => parts.push(format!("until {e}")),
        (None, None) => {}
    }
    if let Some(c) = &filter.category {
        parts.push(format!("category '{c}'"));
    }
    if let Some(k) = &filter.kind {
        parts.push(format!("type '{k}'"));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}
