use crate::cli_args::ConfigArgs;
use crate::output::write_to_stdout;
use anyhow::{Context, Result, bail};
use colored::*;
use std::path::Path;
use treecat_core::Config;
use treecat_core::config::DEFAULT_CONFIG_TEMPLATE;

pub fn handle_config_command(
    args: &ConfigArgs,
    config: &Config,
    base_dir: &Path,
    quiet: bool,
) -> Result<()> {
    if args.save {
        let save_path = Config::default_config_path(base_dir);
        if save_path.exists() && !args.force {
            bail!(
                "Config file '{}' already exists. Use --force to overwrite.",
                save_path.display()
            );
        }
        Config::save_template(&save_path)
            .with_context(|| format!("Failed to save config to {}", save_path.display()))?;
        if !quiet {
            println!(
                "{} Default configuration saved to: {}",
                "✅".green(),
                save_path.display().to_string().blue()
            );
        }
        return Ok(());
    }

    if args.default {
        write_to_stdout(DEFAULT_CONFIG_TEMPLATE)
    } else {
        let content = config
            .to_toml_string()
            .context("Failed to serialize effective configuration")?;
        write_to_stdout(&content)
    }
}
