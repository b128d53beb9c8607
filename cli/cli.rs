mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log;
use std::process;

use cli_args::{AggregateOpts, Cli, Commands, ProjectConfigOpts, TreeOpts};
use treecat_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = match core_err {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) => 1,
                Some(AppError::InvalidArgument(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::WalkDir(_)) => 2,
                Some(_) => 1,
                None => 1,
            };

            // Errors are always reported; quiet only silences the logger.
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    let base_dir = Config::determine_base_dir(cli.project_config.root.as_ref())
        .context("Failed to determine base directory")?;
    let config = load_config_for_command(&base_dir, &cli.project_config, &cli.tree, &cli.aggregate)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            log::debug!("Executing 'run' command...");
            commands::run::handle_run_command(&config, quiet)?;
        }
        Commands::Tree => {
            log::debug!("Executing 'tree' command...");
            commands::tree::handle_tree_command(&config)?;
        }
        Commands::Aggregate => {
            log::debug!("Executing 'aggregate' command...");
            commands::aggregate::handle_aggregate_command(&config, quiet)?;
        }
        Commands::Config(args) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(&args, &config, &base_dir, quiet)?;
        }
    }
    Ok(())
}

fn merge_config_with_cli_overrides(
    mut config: Config,
    project_opts: &ProjectConfigOpts,
    tree_opts: &TreeOpts,
    aggregate_opts: &AggregateOpts,
) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(root) = &project_opts.root {
        config.tree.root = root.clone();
    }
    if !tree_opts.ignore.is_empty() {
        config.tree.ignore = tree_opts.ignore.clone();
    }
    if let Some(output) = &aggregate_opts.output {
        config.aggregate.output = output.clone();
    }
    if !aggregate_opts.files.is_empty() {
        config.aggregate.files = aggregate_opts.files.clone();
    }
    config.apply_skips(&aggregate_opts.skip);

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

/// Defaults, then the config file (if any), then CLI flags.
pub fn load_config_for_command(
    base_dir: &std::path::Path,
    project_opts: &ProjectConfigOpts,
    tree_opts: &TreeOpts,
    aggregate_opts: &AggregateOpts,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        base_dir,
        project_opts.config.as_ref(),
        project_opts.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let config = merge_config_with_cli_overrides(config, project_opts, tree_opts, aggregate_opts);
    log::debug!(
        "Effective config: root={}, ignore={:?}, output={}, {} files",
        config.tree.root.display(),
        config.tree.ignore,
        config.aggregate.output.display(),
        config.aggregate.files.len()
    );
    Ok(config)
}
