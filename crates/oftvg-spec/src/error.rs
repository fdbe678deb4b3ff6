//! Error types for parameter sets, config files and analyzer reports.

use thiserror::Error;

/// Result type for spec-level operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while reading config files or analyzer reports.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A config line does not follow the `SET <KEY>=<VALUE>` grammar.
    #[error("Malformed config line {line}: {text:?}")]
    MalformedConfigLine { line: usize, text: String },

    /// The analyzer output is not a valid report document.
    #[error("Failed to parse analyzer report: {0}")]
    ParseReportFailed(#[source] serde_json::Error),
}

impl SpecError {
    /// Creates a new malformed config line error.
    pub fn malformed_line(line: usize, text: impl Into<String>) -> Self {
        Self::MalformedConfigLine {
            line,
            text: text.into(),
        }
    }
}

/// Common trait for the harness error types.
///
/// Every infrastructure error carries a stable code and a category so the
/// CLI can report fatal errors uniformly without knowing which crate raised
/// them.
///
/// # Example
///
/// ```
/// use oftvg_spec::{parse_config, HarnessError};
///
/// let err = parse_config("OUTPUT=out.avi").unwrap_err();
/// assert_eq!(format!("[{}] {}", err.code(), err.message()),
///            "[SPEC_001] Malformed config line 1: \"OUTPUT=out.avi\"");
/// ```
pub trait HarnessError: std::error::Error {
    /// Get the error code for reporting, e.g. "SPEC_001" or "RUNNER_004".
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category ("spec", "runner", ...).
    fn category(&self) -> &'static str;
}

impl HarnessError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::MalformedConfigLine { .. } => "SPEC_001",
            SpecError::ParseReportFailed(_) => "SPEC_002",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}
