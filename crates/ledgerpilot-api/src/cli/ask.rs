//! `lpilot ask`: grounded question answering.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use ledgerpilot_core::copilot::AnswerOutcome;

use crate::cli::OutputMode;
use crate::cli::render::hits_table;
use crate::state::AppState;

pub async fn ask(
    state: &AppState,
    question: &str,
    show_context: bool,
    top_k: Option<usize>,
    mode: OutputMode,
) -> Result<()> {
    let copilot = state.copilot(top_k).await?;

    let spinner = ProgressBar::new_spinner();
    if mode.styled() {
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(spinner_style);
        }
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
    } else {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let outcome = copilot.answer_with_context(question).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if mode.json {
        let out = if show_context {
            serde_json::to_value(&outcome)?
        } else {
            serde_json::json!({ "answer": outcome.answer })
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if mode.quiet {
        println!("{}", outcome.answer);
        return Ok(());
    }

    if show_context {
        print_context(&outcome);
    }

    println!();
    println!("  {}", style(&outcome.answer).white());
    println!();
    Ok(())
}

fn print_context(outcome: &AnswerOutcome) {
    println!();
    println!("  {} {}", style("Retrieval query:").bold(), style(&outcome.rewritten).dim());
    if outcome.hits.is_empty() {
        println!("  {} No transactions retrieved.", style("i").blue().bold());
        return;
    }
    println!();
    println!("{}", hits_table(&outcome.hits));
}
