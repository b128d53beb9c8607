use crate::error::{AppError, Result};
use log;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "aggregated_code.txt";
pub const SEPARATOR_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Included { bytes: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    pub path: String,
    pub outcome: FileOutcome,
}

/// Per-path results of an aggregation run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub sections: Vec<FileSection>,
}

impl AggregateReport {
    pub fn included(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s.outcome, FileOutcome::Included { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.sections.len() - self.included()
    }

    pub fn total_bytes(&self) -> usize {
        self.sections
            .iter()
            .map(|s| match s.outcome {
                FileOutcome::Included { bytes } => bytes,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// Header written before each file: separator, path line, separator, blank line.
pub fn banner(path: &str) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    format!("\n{separator}\nFile: {path}\n{separator}\n\n")
}

/// Line written in place of a file's content when it cannot be read.
pub(crate) fn error_line(path: &str, reason: &str) -> String {
    format!("Error reading file {path}: {reason}\n")
}

fn read_utf8(path: &Path) -> std::result::Result<String, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| format!("invalid UTF-8 data: {}", e.utf8_error()))
}

/// Writes one banner block per path, followed by the file's content or by a
/// single error line when the file cannot be read as UTF-8.
///
/// Read failures never abort the run. Failures writing to `out` are returned
/// as the raw `io::Error`; `aggregate_code` attaches the output path.
pub fn aggregate_into<P, W>(file_paths: &[P], out: &mut W) -> io::Result<AggregateReport>
where
    P: AsRef<str>,
    W: Write,
{
    let mut report = AggregateReport::default();

    for file_path in file_paths {
        let file_path = file_path.as_ref();
        out.write_all(banner(file_path).as_bytes())?;

        let outcome = match read_utf8(Path::new(file_path)) {
            Ok(content) => {
                out.write_all(content.as_bytes())?;
                out.write_all(b"\n")?;
                log::debug!("Aggregated {} ({} bytes)", file_path, content.len());
                FileOutcome::Included {
                    bytes: content.len(),
                }
            }
            Err(reason) => {
                log::warn!("Error reading file {}: {}", file_path, reason);
                out.write_all(error_line(file_path, &reason).as_bytes())?;
                FileOutcome::Failed { reason }
            }
        };

        report.sections.push(FileSection {
            path: file_path.to_string(),
            outcome,
        });
    }

    Ok(report)
}

/// Creates (or truncates) `output_path` and aggregates `file_paths` into it.
pub fn aggregate_code<P: AsRef<str>>(file_paths: &[P], output_path: &Path) -> Result<AggregateReport> {
    let write_err = |e: io::Error| AppError::FileWrite {
        path: PathBuf::from(output_path),
        source: e,
    };

    log::info!(
        "Aggregating {} files into {}",
        file_paths.len(),
        output_path.display()
    );
    let file = File::create(output_path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let report = aggregate_into(file_paths, &mut writer).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    log::info!(
        "Aggregation complete: {} included, {} failed, {} bytes.",
        report.included(),
        report.failed(),
        report.total_bytes()
    );
    Ok(report)
}
