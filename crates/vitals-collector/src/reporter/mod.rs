//! Report output
//!
//! This module handles formatting performance reports.
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable format with camelCase keys
//! - **Summary**: Human-readable list of the headline vitals and their ratings
//!
//! # Example
//!
//! ```no_run
//! use vitals_collector::reporter::{Reporter, OutputFormat};
//! use vitals_collector::report::Report;
//!
//! # fn example(report: Report) -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Summary);
//! reporter.report(&report)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::JsonPretty)
//!     .write_to_file(&report, "vitals.json")?;
//! # Ok(())
//! # }
//! ```

mod summary;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::report::Report;

pub use summary::SummaryReporter;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Plain-text summary
    #[default]
    Summary,
}

/// Reporter for performance reports
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report to stdout
    pub fn report(&self, report: &Report) -> Result<()> {
        let output = self.format_report(report)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write a report to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, report: &Report, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_report(report)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Format a report as a string
    pub fn format_report(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(report)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Summary => SummaryReporter::format(report),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
