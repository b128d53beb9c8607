pub mod aggregate;
pub mod config;
pub mod error;
pub mod tree;

pub use aggregate::{
    AggregateReport, DEFAULT_OUTPUT_FILE, FileOutcome, FileSection, aggregate_code,
    aggregate_into, banner,
};
pub use config::{AggregateConfig, Config, TreeConfig};
pub use error::{AppError, Result};
pub use tree::{IgnorePatterns, TreeBlock, TreeLine, build_tree, generate_project_tree};
