//! Per-input conversion reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use opendrive_eval::MessageList;

/// How a pipeline run for one input ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The output file was written.
    Completed {
        /// The written output path.
        output: PathBuf,
    },
    /// A fatal finding stopped the run; no output was written.
    Fatal,
    /// The host cancelled the run; no output was written.
    Cancelled,
}

/// The report of one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Name of the input.
    pub input: String,
    /// How the run ended.
    pub outcome: Outcome,
    /// Every finding, in traversal order.
    pub messages: MessageList,
}

impl PipelineReport {
    /// Whether the run produced an output file.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. })
    }

    /// Persist the report as JSON next to the output path
    /// (`<output>.report.json`).
    ///
    /// # Errors
    ///
    /// Fails on I/O or serialisation errors.
    pub fn persist_next_to(&self, output: &Path) -> std::io::Result<PathBuf> {
        let mut report_path = output.as_os_str().to_owned();
        report_path.push(".report.json");
        let report_path = PathBuf::from(report_path);

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = std::fs::File::create(&report_path)?;
        file.write_all(json.as_bytes())?;
        Ok(report_path)
    }
}

/// The exit code of a batch: non-zero only in strict mode with fatals.
#[must_use]
pub fn exit_code(reports: &[PipelineReport], strict: bool) -> i32 {
    let any_fatal = reports.iter().any(|r| r.messages.has_fatal());
    i32::from(strict && any_fatal)
}
