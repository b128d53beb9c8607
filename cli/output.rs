use anyhow::{Context, Result};
use colored::*;
use std::io::{self, Write};
use std::path::Path;
use treecat_core::{AggregateReport, FileOutcome};

pub fn print_tree_section(root: &Path, tree_text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "\n{}", "Project Tree Structure:".bold())
        .context("Failed to write to stdout")?;
    writeln!(handle, "Root: {}", root.display()).context("Failed to write to stdout")?;
    writeln!(handle, "{}", tree_text).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_aggregate_confirmation(output_path: &Path) -> Result<()> {
    write_to_stdout(&format!(
        "\nCode has been aggregated into '{}'\n",
        output_path.display()
    ))
}

/// Lists the files that could not be read. Their error lines are already in
/// the output file; this only repeats them on stderr.
pub fn report_failed_files(report: &AggregateReport) {
    let failures: Vec<_> = report
        .sections
        .iter()
        .filter_map(|s| match &s.outcome {
            FileOutcome::Failed { reason } => Some((&s.path, reason)),
            FileOutcome::Included { .. } => None,
        })
        .collect();
    if failures.is_empty() {
        return;
    }
    eprintln!(
        "\n{}",
        "⚠️ Warning: Some files could not be read:".yellow()
    );
    for (path, reason) in failures {
        eprintln!(" - {}: {}", path, reason);
    }
    eprintln!("---");
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
