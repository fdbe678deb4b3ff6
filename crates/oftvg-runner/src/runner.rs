//! Test runner: config file, generator run, analyzer run, report parsing.
//!
//! One [`TestRunner`] is created per suite. It resolves both tools once and
//! then runs each test synchronously:
//!
//! 1. fill in INPUT/OUTPUT/LAYOUT defaults
//! 2. write the `SET K=V` config file
//! 3. run `<generator> <config file>`; non-zero exit is fatal
//! 4. run `<analyzer> <OUTPUT>`, keep a copy of its stdout, parse it as JSON
//!
//! The config file, the analyzer output copy and a relative OUTPUT all live
//! in the working directory and are overwritten by every test. Two runners
//! sharing a working directory must not run at the same time.

use colored::Colorize;
use oftvg_spec::{keys, AnalysisResult, ParameterSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{RunnerError, RunnerResult};
use crate::locator::{locate_tools, Tool, ToolPaths};

/// Config file the generator reads.
pub const DEFAULT_CONFIG_FILE: &str = "test_config.tvg";

/// Copy of the last analyzer stdout.
pub const DEFAULT_ANALYZER_OUTPUT_FILE: &str = "analyzer_output.txt";

/// OUTPUT used when a test does not name one.
pub const DEFAULT_OUTPUT: &str = "output.mov";

/// Sample input video shipped in the tool directory.
pub const DEFAULT_INPUT_ASSET: &str = "big_buck_bunny_1080p_h264.mp4";

/// Layout description image shipped in the tool directory.
pub const DEFAULT_LAYOUT_ASSET: &str = "layout.bmp";

/// Anything that can turn a parameter set into an analyzer report.
///
/// [`TestRunner`] is the real implementation; test cases only depend on
/// this trait.
pub trait RunTest {
    /// Runs one test and returns the analyzer report.
    fn run_test(&self, params: ParameterSet) -> RunnerResult<AnalysisResult>;
}

/// Configuration for the test runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the tool scripts and reference assets.
    pub tool_dir: PathBuf,
    /// Directory for scratch files; tools run with this as current directory.
    pub work_dir: PathBuf,
    /// Config file path, relative to `work_dir` unless absolute.
    pub config_file: PathBuf,
    /// Analyzer output copy, relative to `work_dir` unless absolute.
    pub analyzer_output_file: PathBuf,
    /// OUTPUT value when the test omits it.
    pub default_output: String,
    /// INPUT value when the test omits it. `None` means the tool directory sample.
    pub default_input: Option<PathBuf>,
    /// LAYOUT value when the test omits it. `None` means the tool directory layout.
    pub default_layout: Option<PathBuf>,
    /// Print stage banners and command lines, and pass generator stdout through.
    pub verbose: bool,
}

impl RunnerConfig {
    /// Creates a config for the given tool directory with default scratch paths.
    pub fn with_tool_dir(tool_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: tool_dir.into(),
            work_dir: PathBuf::from("."),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            analyzer_output_file: PathBuf::from(DEFAULT_ANALYZER_OUTPUT_FILE),
            default_output: DEFAULT_OUTPUT.to_string(),
            default_input: None,
            default_layout: None,
            verbose: true,
        }
    }

    /// Sets the working directory.
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Sets the config file path.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    /// Sets the analyzer output copy path.
    pub fn analyzer_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.analyzer_output_file = path.into();
        self
    }

    /// Sets the default OUTPUT value.
    pub fn default_output(mut self, output: impl Into<String>) -> Self {
        self.default_output = output.into();
        self
    }

    /// Sets the default INPUT asset.
    pub fn default_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_input = Some(path.into());
        self
    }

    /// Sets the default LAYOUT asset.
    pub fn default_layout(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_layout = Some(path.into());
        self
    }

    /// Enables or disables progress output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Runs tests through the external generator and analyzer.
#[derive(Debug, Clone)]
pub struct TestRunner {
    config: RunnerConfig,
    tools: ToolPaths,
    config_path: PathBuf,
    analyzer_output_path: PathBuf,
    input: PathBuf,
    layout: PathBuf,
}

impl TestRunner {
    /// Creates a runner for `tool_dir` with default configuration.
    pub fn new(tool_dir: impl Into<PathBuf>) -> RunnerResult<Self> {
        Self::with_config(RunnerConfig::with_tool_dir(tool_dir))
    }

    /// Creates a runner, resolving both tools and preparing the working directory.
    pub fn with_config(mut config: RunnerConfig) -> RunnerResult<Self> {
        config.tool_dir =
            std::path::absolute(&config.tool_dir).map_err(|source| RunnerError::ToolDirFailed {
                path: config.tool_dir.clone(),
                source,
            })?;
        let tools = locate_tools(&config.tool_dir)?;

        fs::create_dir_all(&config.work_dir).map_err(|source| RunnerError::WorkDirFailed {
            path: config.work_dir.clone(),
            source,
        })?;
        config.work_dir = absolute_work_dir(&config.work_dir)?;

        let config_path = config.work_dir.join(&config.config_file);
        let analyzer_output_path = config.work_dir.join(&config.analyzer_output_file);
        let input = config
            .default_input
            .clone()
            .unwrap_or_else(|| config.tool_dir.join(DEFAULT_INPUT_ASSET));
        let layout = config
            .default_layout
            .clone()
            .unwrap_or_else(|| config.tool_dir.join(DEFAULT_LAYOUT_ASSET));

        Ok(Self {
            config,
            tools,
            config_path,
            analyzer_output_path,
            input,
            layout,
        })
    }

    /// Returns the runner configuration, with absolute directories.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Returns the resolved tool executables.
    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    /// Path of the generator config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Path of the analyzer output copy.
    pub fn analyzer_output_path(&self) -> &Path {
        &self.analyzer_output_path
    }

    /// Fills in INPUT, OUTPUT and LAYOUT where the test left them out.
    pub fn apply_defaults(&self, params: &mut ParameterSet) {
        params.insert_default(keys::INPUT, self.input.display().to_string());
        params.insert_default(keys::OUTPUT, self.config.default_output.clone());
        params.insert_default(keys::LAYOUT, self.layout.display().to_string());
    }

    /// Writes the config file, replacing any previous content.
    pub fn write_config(&self, params: &ParameterSet) -> RunnerResult<&Path> {
        fs::write(&self.config_path, params.to_config_string()).map_err(|source| {
            RunnerError::WriteConfigFailed {
                path: self.config_path.clone(),
                source,
            }
        })?;
        Ok(&self.config_path)
    }

    fn run_generator(&self) -> RunnerResult<()> {
        let generator = &self.tools.generator;
        if self.config.verbose {
            print_stage("Generating test video");
            println!(
                "{} {} {}",
                "Running command:".dimmed(),
                generator.display(),
                self.config_path.display()
            );
        }

        let mut cmd = Command::new(generator);
        cmd.arg(&self.config_path)
            .current_dir(&self.config.work_dir)
            .stdin(Stdio::null());
        if !self.config.verbose {
            cmd.stdout(Stdio::null());
        }

        let status = cmd.status().map_err(|source| RunnerError::SpawnFailed {
            tool: Tool::Generator,
            path: generator.clone(),
            source,
        })?;

        if !status.success() {
            return Err(RunnerError::process_failed(
                Tool::Generator,
                generator,
                status.code().unwrap_or(-1),
                "",
            ));
        }
        Ok(())
    }

    fn run_analyzer(&self, media: &str) -> RunnerResult<Vec<u8>> {
        let analyzer = &self.tools.analyzer;
        if self.config.verbose {
            print_stage("Analyzing result file");
            println!(
                "{} {} {} > {}",
                "Running command:".dimmed(),
                analyzer.display(),
                media,
                self.analyzer_output_path.display()
            );
        }

        let output = Command::new(analyzer)
            .arg(media)
            .current_dir(&self.config.work_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RunnerError::SpawnFailed {
                tool: Tool::Analyzer,
                path: analyzer.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RunnerError::process_failed(
                Tool::Analyzer,
                analyzer,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        // Analyzer diagnostics on success go to the terminal, not the report.
        if self.config.verbose {
            echo_stderr(&output.stderr);
        }

        fs::write(&self.analyzer_output_path, &output.stdout).map_err(|source| {
            RunnerError::WriteDiagnosticFailed {
                path: self.analyzer_output_path.clone(),
                source,
            }
        })?;

        Ok(output.stdout)
    }
}

impl RunTest for TestRunner {
    fn run_test(&self, mut params: ParameterSet) -> RunnerResult<AnalysisResult> {
        self.apply_defaults(&mut params);
        self.write_config(&params)?;
        self.run_generator()?;

        // apply_defaults guarantees OUTPUT is present.
        let media = params
            .get(keys::OUTPUT)
            .unwrap_or(self.config.default_output.as_str())
            .to_string();
        let stdout = self.run_analyzer(&media)?;

        Ok(AnalysisResult::from_slice(&stdout)?)
    }
}

fn print_stage(title: &str) {
    println!();
    println!("{}", "====================".cyan());
    println!("{}", title.cyan().bold());
}

fn echo_stderr(stderr: &[u8]) {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim_end();
    if !text.is_empty() {
        eprintln!("{}", text);
    }
}

fn absolute_work_dir(path: &Path) -> RunnerResult<PathBuf> {
    std::path::absolute(path).map_err(|source| RunnerError::WorkDirFailed {
        path: path.to_path_buf(),
        source,
    })
}
