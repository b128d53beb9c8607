use crate::aggregate::DEFAULT_OUTPUT_FILE;
use crate::error::{AppError, Result};
use crate::tree::{DEFAULT_IGNORE_PATTERNS, IgnorePatterns};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".treecat";
pub const DEFAULT_CONFIG_FILENAME: &str = "treecat.toml";
pub const DEFAULT_ROOT: &str = ".";

pub const DEFAULT_FILES: [&str; 5] = [
    "./scripts/constants.js",
    "./scripts/main.js",
    "./scripts/world.js",
    "./scripts/chunksWorker.js",
    "./scripts/geometryWorker.js",
];

/// Template written by `treecat config --default`. Parses to `Config::default()`;
/// commented entries stay listed but are not aggregated.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# treecat configuration

[tree]
# Directory whose structure is printed.
root = "."
# Entries whose path contains any of these substrings are skipped.
ignore = [".git", "__pycache__", ".idea", ".vscode"]

[aggregate]
output = "aggregated_code.txt"
# Files are written in this order. Comment a line out to leave it out.
files = [
    # "./scripts/collision-system.js",
    "./scripts/constants.js",
    "./scripts/main.js",
    # "./scripts/player.js",
    # "./scripts/renderer.js",
    # "./scripts/utils.js",
    "./scripts/world.js",
    # "./index.html",
    "./scripts/chunksWorker.js",
    "./scripts/geometryWorker.js",
]
"#;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AggregateConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_files")]
    pub files: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}
fn default_ignore() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}
fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}
fn default_files() -> Vec<String> {
    DEFAULT_FILES.iter().map(|s| s.to_string()).collect()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            ignore: default_ignore(),
        }
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            files: default_files(),
        }
    }
}

impl Config {
    /// Directory searched for `.treecat/treecat.toml`: the CLI root if given,
    /// otherwise the current directory.
    pub fn determine_base_dir(cli_root: Option<&PathBuf>) -> Result<PathBuf> {
        match cli_root {
            Some(p) => Ok(expand_tilde(p)),
            None => env::current_dir().map_err(AppError::Io),
        }
    }

    pub fn default_config_path(base_dir: &Path) -> PathBuf {
        base_dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)
    }

    pub fn resolve_config_path(
        base_dir: &Path,
        cli_config_file: Option<&PathBuf>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p) => {
                let path = expand_tilde(p);
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = Self::default_config_path(base_dir);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    pub fn ignore_patterns(&self) -> IgnorePatterns {
        IgnorePatterns::new(self.tree.ignore.iter().cloned())
    }

    pub fn effective_root(&self) -> PathBuf {
        expand_tilde(&self.tree.root)
    }

    pub fn effective_output(&self) -> PathBuf {
        expand_tilde(&self.aggregate.output)
    }

    /// Drops every file entry that matches one of `skips` exactly, keeping order.
    pub fn apply_skips(&mut self, skips: &[String]) {
        if skips.is_empty() {
            return;
        }
        self.aggregate.files.retain(|f| {
            let skipped = skips.iter().any(|s| s == f);
            if skipped {
                log::debug!("Skipping file entry via CLI: {}", f);
            }
            !skipped
        });
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}
