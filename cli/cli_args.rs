use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        global = true,
        help = "Directory whose tree is printed (default: config value or '.').",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Path of the TOML config file (default: .treecat/treecat.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TreeOpts {
    #[arg(
        short = 'i',
        long = "ignore",
        global = true,
        value_name = "PATTERN",
        help = "Skip entries whose path contains PATTERN. Repeatable; replaces the configured list.",
        help_heading = "Tree"
    )]
    pub ignore: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AggregateOpts {
    #[arg(
        short = 'o',
        long,
        global = true,
        value_name = "FILE",
        help = "Aggregated output file (default: aggregated_code.txt).",
        help_heading = "Aggregation"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long = "file",
        global = true,
        value_name = "PATH",
        help = "File to aggregate, in order. Repeatable; replaces the configured list.",
        help_heading = "Aggregation"
    )]
    pub files: Vec<String>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Leave PATH out of the file list for this run. Repeatable.",
        help_heading = "Aggregation"
    )]
    pub skip: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print a project tree and aggregate selected files into one text file.",
    long_about = "treecat prints the directory structure of a project, skipping common \nmetadata directories, then concatenates a curated, ordered list of files into \na single output file with a banner before each one.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  treecat\n  treecat tree --root ./src -i target\n  treecat aggregate -f src/lib.rs -f src/main.rs -o bundle.txt\n  treecat config --default --save"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub tree: TreeOpts,
    #[clap(flatten)]
    pub aggregate: AggregateOpts,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "r",
        about = "Print the project tree, then aggregate the file list [default]."
    )]
    Run,

    #[command(visible_alias = "t", about = "Print the project tree only.")]
    Tree,

    #[command(
        visible_alias = "a",
        about = "Aggregate the file list into the output file only."
    )]
    Aggregate,

    #[command(about = "Show or save the configuration file.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        long,
        help = "Show the default configuration template instead of the effective configuration."
    )]
    pub default: bool,

    #[arg(
        short,
        long,
        help = "Save the default configuration template to .treecat/treecat.toml."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing config file.")]
    pub force: bool,
}
