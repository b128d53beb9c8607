use crate::output::print_tree_section;
use anyhow::{Context, Result};
use log;
use treecat_core::{Config, generate_project_tree};

pub fn handle_tree_command(config: &Config) -> Result<()> {
    let root = config.effective_root();
    let ignore = config.ignore_patterns();
    log::info!("Rendering tree for {}", root.display());

    let tree_text = generate_project_tree(&root, "", &ignore)
        .with_context(|| format!("Failed to build tree for {}", root.display()))?;

    // Show the root as configured, not the expanded path.
    print_tree_section(&config.tree.root, &tree_text)
}
