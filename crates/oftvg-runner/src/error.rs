//! Error types for tool resolution and invocation.

use oftvg_spec::{HarnessError, SpecError};
use std::path::PathBuf;
use thiserror::Error;

use crate::locator::Tool;

/// Result type for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors that abort a suite run.
///
/// None of these are attributed to a single test case: they mean the tool
/// directory, the working directory or the external tools are broken.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No candidate executable exists for a tool.
    #[error("Could not find {tool} script in path {dir} (tried: {candidates})")]
    ToolNotFound {
        tool: Tool,
        dir: PathBuf,
        candidates: String,
    },

    /// The tool directory could not be made absolute.
    #[error("Failed to resolve tool directory {path:?}: {source}")]
    ToolDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The working directory could not be prepared.
    #[error("Failed to prepare working directory {path}: {source}")]
    WorkDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the generator config file.
    #[error("Failed to write config file {path}: {source}")]
    WriteConfigFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to start a tool process.
    #[error("Failed to spawn {tool} process {path}: {source}")]
    SpawnFailed {
        tool: Tool,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tool process exited with non-zero status.
    #[error("{tool} process {path} exited with status {exit_code}{}", format_stderr(.stderr))]
    ProcessFailed {
        tool: Tool,
        path: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    /// Failed to persist the raw analyzer output.
    #[error("Failed to write analyzer output to {path}: {source}")]
    WriteDiagnosticFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The analyzer output could not be parsed.
    #[error("Analyzer output is not a valid report: {0}")]
    InvalidReport(#[from] SpecError),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl RunnerError {
    /// Creates a new tool-not-found error.
    pub fn tool_not_found(tool: Tool, dir: impl Into<PathBuf>) -> Self {
        Self::ToolNotFound {
            tool,
            dir: dir.into(),
            candidates: tool.candidates().join(", "),
        }
    }

    /// Creates a new process failed error.
    pub fn process_failed(
        tool: Tool,
        path: impl Into<PathBuf>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ProcessFailed {
            tool,
            path: path.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl HarnessError for RunnerError {
    fn code(&self) -> &'static str {
        match self {
            RunnerError::ToolNotFound { .. } => "RUNNER_001",
            RunnerError::WorkDirFailed { .. } => "RUNNER_002",
            RunnerError::WriteConfigFailed { .. } => "RUNNER_003",
            RunnerError::SpawnFailed { .. } => "RUNNER_004",
            RunnerError::ProcessFailed { .. } => "RUNNER_005",
            RunnerError::WriteDiagnosticFailed { .. } => "RUNNER_006",
            RunnerError::InvalidReport(_) => "RUNNER_007",
            RunnerError::ToolDirFailed { .. } => "RUNNER_008",
        }
    }

    fn category(&self) -> &'static str {
        "runner"
    }
}
