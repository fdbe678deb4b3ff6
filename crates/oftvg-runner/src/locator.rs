//! Resolution of the generator and analyzer executables in a tool directory.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{RunnerError, RunnerResult};

/// Generator candidates, in priority order.
pub const GENERATOR_CANDIDATES: &[&str] = &["Run_TVG.bat", "Run_TVG.sh"];

/// Analyzer candidates, in priority order.
pub const ANALYZER_CANDIDATES: &[&str] = &["Analyzer.bat", "Analyzer.sh"];

/// One of the two external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Synthesizes a test video from a config file.
    Generator,
    /// Inspects a video and prints a JSON report.
    Analyzer,
}

impl Tool {
    /// Script base name, as shipped in the tool directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Generator => "Run_TVG",
            Tool::Analyzer => "Analyzer",
        }
    }

    /// Candidate file names, tried in order.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Tool::Generator => GENERATOR_CANDIDATES,
            Tool::Analyzer => ANALYZER_CANDIDATES,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved executables for one runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub generator: PathBuf,
    pub analyzer: PathBuf,
}

/// Finds the first candidate for `tool` that exists as a regular file in `dir`.
pub fn locate_tool(dir: &Path, tool: Tool) -> RunnerResult<PathBuf> {
    tool.candidates()
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| RunnerError::tool_not_found(tool, dir))
}

/// Finds both tools in `dir`. The generator is checked first.
pub fn locate_tools(dir: &Path) -> RunnerResult<ToolPaths> {
    Ok(ToolPaths {
        generator: locate_tool(dir, Tool::Generator)?,
        analyzer: locate_tool(dir, Tool::Analyzer)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tool_names() {
        assert_eq!(Tool::Generator.as_str(), "Run_TVG");
        assert_eq!(Tool::Analyzer.to_string(), "Analyzer");
        assert_eq!(Tool::Analyzer.candidates(), ANALYZER_CANDIDATES);
    }

    #[test]
    fn test_locate_prefers_batch_variant() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Run_TVG.bat"), "").unwrap();
        fs::write(dir.path().join("Run_TVG.sh"), "").unwrap();

        let found = locate_tool(dir.path(), Tool::Generator).unwrap();
        assert_eq!(found, dir.path().join("Run_TVG.bat"));
    }

    #[test]
    fn test_locate_falls_back_to_shell_variant() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Analyzer.sh"), "").unwrap();

        let found = locate_tool(dir.path(), Tool::Analyzer).unwrap();
        assert_eq!(found, dir.path().join("Analyzer.sh"));
    }

    #[test]
    fn test_directory_is_not_a_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Run_TVG.bat")).unwrap();

        let err = locate_tool(dir.path(), Tool::Generator).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::ToolNotFound {
                tool: Tool::Generator,
                ..
            }
        ));
    }

    #[test]
    fn test_locate_tools_reports_missing_analyzer() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Run_TVG.sh"), "").unwrap();

        let err = locate_tools(dir.path()).unwrap_err();
        match err {
            RunnerError::ToolNotFound { tool, dir: searched, .. } => {
                assert_eq!(tool, Tool::Analyzer);
                assert_eq!(searched, dir.path());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locate_tools_success() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Run_TVG.sh"), "").unwrap();
        fs::write(dir.path().join("Analyzer.bat"), "").unwrap();

        let tools = locate_tools(dir.path()).unwrap();
        assert_eq!(tools.generator, dir.path().join("Run_TVG.sh"));
        assert_eq!(tools.analyzer, dir.path().join("Analyzer.bat"));
    }
}
