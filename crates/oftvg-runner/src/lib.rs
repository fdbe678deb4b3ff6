//! OFTVG Test Runner
//!
//! This crate drives the two external tools of the test video generator:
//!
//! - the generator (`Run_TVG.bat` / `Run_TVG.sh`), which reads a
//!   `SET K=V` config file and writes a media file to OUTPUT
//! - the analyzer (`Analyzer.bat` / `Analyzer.sh`), which inspects that
//!   media file and prints a JSON report to stdout
//!
//! Both are resolved once, when the [`TestRunner`] is created. Each
//! [`RunTest::run_test`] call blocks until both tools have exited; there is no
//! timeout, so a hung tool hangs the caller.
//!
//! # Example
//!
//! ```no_run
//! use oftvg_runner::{RunTest, TestRunner};
//! use oftvg_spec::{keys, ParameterSet};
//!
//! let runner = TestRunner::new("/opt/tvg")?;
//! let report = runner.run_test(
//!     ParameterSet::new()
//!         .with(keys::CONTAINER, "avimux")
//!         .with(keys::OUTPUT, "output.avi"),
//! )?;
//! println!("Demuxer: {}", report.demuxer);
//! # Ok::<(), oftvg_runner::RunnerError>(())
//! ```

pub mod error;
pub mod locator;
pub mod runner;

pub use error::{RunnerError, RunnerResult};
pub use locator::{
    locate_tool, locate_tools, Tool, ToolPaths, ANALYZER_CANDIDATES, GENERATOR_CANDIDATES,
};
pub use runner::{
    RunTest, RunnerConfig, TestRunner, DEFAULT_ANALYZER_OUTPUT_FILE, DEFAULT_CONFIG_FILE,
    DEFAULT_INPUT_ASSET, DEFAULT_LAYOUT_ASSET, DEFAULT_OUTPUT,
};
