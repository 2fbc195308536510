//! Batch processing with a progress bar and a console summary.

use console::style;
use std::path::Path;
use std::time::{Duration, Instant};

use watermarker_core::{run_batch, BatchSummary, DiscoveredFile, OutcomeStatus};

use super::RunContext;

/// Watermark every discovered file, then print a summary.
pub fn process_batch(mut ctx: RunContext, files: Vec<DiscoveredFile>) -> anyhow::Result<()> {
    let progress = create_progress_bar(files.len() as u64);
    let start_time = Instant::now();

    let summary = run_batch(&ctx.processor, &ctx.config, &files, &mut ctx.log, |outcome| {
        progress.inc(1);
        if outcome.status != OutcomeStatus::Success {
            progress.set_message(format!("{} {}", outcome.status, outcome.file_name));
        } else {
            progress.set_message(outcome.file_name.clone());
        }
    })?;

    progress.finish_and_clear();
    print_summary(&summary, start_time.elapsed(), ctx.log.path());

    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(summary: &BatchSummary, elapsed: Duration, log_path: Option<&Path>) {
    let rate = if elapsed.as_secs_f64() > 0.0 {
        summary.attempted() as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Found:        {:>8}", summary.found);
    eprintln!(
        "    Succeeded:    {:>8}",
        style(summary.succeeded).for_stderr().green()
    );
    if summary.failed > 0 {
        eprintln!("    Failed:       {:>8}", style(summary.failed).for_stderr().red());
    }
    if summary.skipped > 0 {
        eprintln!(
            "    Skipped:      {:>8}",
            style(summary.skipped).for_stderr().yellow()
        );
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
    if let Some(path) = log_path {
        eprintln!("  Log: {}", style(path.display()).for_stderr().dim());
    }
}
