use crate::output::{print_aggregate_confirmation, report_failed_files};
use anyhow::{Context, Result};
use log;
use treecat_core::{Config, aggregate_code};

pub fn handle_aggregate_command(config: &Config, quiet: bool) -> Result<()> {
    let output_path = config.effective_output();
    if config.aggregate.files.is_empty() {
        log::warn!("File list is empty; writing an empty {}", output_path.display());
    }

    let report = aggregate_code(config.aggregate.files.as_slice(), &output_path)
        .with_context(|| format!("Failed to aggregate into {}", output_path.display()))?;

    if !quiet {
        report_failed_files(&report);
        print_aggregate_confirmation(&config.aggregate.output)?;
    }
    Ok(())
}
