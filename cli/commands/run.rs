use super::{aggregate::handle_aggregate_command, tree::handle_tree_command};
use anyhow::Result;
use treecat_core::Config;

/// Tree first, then aggregation. A tree failure stops the run before any
/// output file is written.
pub fn handle_run_command(config: &Config, quiet: bool) -> Result<()> {
    handle_tree_command(config)?;
    handle_aggregate_command(config, quiet)
}
