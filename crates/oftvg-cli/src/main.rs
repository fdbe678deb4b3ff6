//! OFTVG Suite - runs the generator/analyzer test suite
//!
//! Exit status: 0 if every case passed, 1 if any case failed, 2 if the suite
//! could not run (missing tools, tool failure, unreadable report, bad usage).

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use oftvg_harness::{CaseRegistry, RegistryError, SuiteDriver};
use oftvg_runner::{RunnerConfig, RunnerError, TestRunner};
use oftvg_spec::{HarnessError, SpecError};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for errors that stop the suite before a verdict.
const EXIT_FATAL: u8 = 2;

/// Code for fatal errors raised by the CLI itself.
const CLI_ERROR_CODE: &str = "CLI_001";

/// Run the OFTVG generator/analyzer test suite
#[derive(Parser, Debug)]
#[command(name = "oftvg-suite")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding Run_TVG and Analyzer scripts and the reference assets
    #[arg(value_name = "TOOL_DIR", required_unless_present = "list")]
    tool_dir: Option<PathBuf>,

    /// Directory for the config file, analyzer output and generated media
    #[arg(long, value_name = "DIR")]
    work_dir: Option<PathBuf>,

    /// Run only the named test case (repeatable)
    #[arg(long = "case", value_name = "NAME")]
    cases: Vec<String>,

    /// List registered test cases and exit
    #[arg(long)]
    list: bool,

    /// Print the suite report as JSON (no colored output)
    #[arg(long)]
    json: bool,

    /// Suppress generator/analyzer progress output
    #[arg(short, long)]
    quiet: bool,
}

/// A fatal error as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FatalError {
    code: &'static str,
    category: &'static str,
    message: String,
    /// Full context chain, outermost first.
    detail: String,
}

impl FatalError {
    /// Picks the first coded error in the chain; anything else is a CLI error.
    fn from_anyhow(err: &anyhow::Error) -> Self {
        let detail = format!("{:#}", err);
        match coded_cause(err) {
            Some(cause) => Self {
                code: cause.code(),
                category: cause.category(),
                message: cause.message(),
                detail,
            },
            None => Self {
                code: CLI_ERROR_CODE,
                category: "cli",
                message: err.to_string(),
                detail,
            },
        }
    }
}

fn coded_cause(err: &anyhow::Error) -> Option<&dyn HarnessError> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<RunnerError>() {
            return Some(e as &dyn HarnessError);
        }
        if let Some(e) = cause.downcast_ref::<RegistryError>() {
            return Some(e as &dyn HarnessError);
        }
        cause
            .downcast_ref::<SpecError>()
            .map(|e| e as &dyn HarnessError)
    })
}

#[derive(Serialize)]
struct FatalOutput<'a> {
    error: &'a FatalError,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let fatal = FatalError::from_anyhow(&e);
            eprintln!(
                "{}: [{}] {}",
                "error".red().bold(),
                fatal.code,
                fatal.detail
            );
            if json {
                match serde_json::to_string_pretty(&FatalOutput { error: &fatal }) {
                    Ok(out) => println!("{}", out),
                    Err(err) => eprintln!("{}: {}", "error".red().bold(), err),
                }
            }
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let registry = CaseRegistry::builtin();

    if cli.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let registry = if cli.cases.is_empty() {
        registry
    } else {
        registry
            .select(cli.cases.as_slice())
            .context("Invalid --case selection")?
    };

    let tool_dir = cli.tool_dir.context("TOOL_DIR is required")?;
    let mut config = RunnerConfig::with_tool_dir(&tool_dir).verbose(!cli.quiet && !cli.json);
    if let Some(work_dir) = cli.work_dir {
        config = config.work_dir(work_dir);
    }

    let runner = TestRunner::with_config(config)
        .with_context(|| format!("Failed to set up test runner for {}", tool_dir.display()))?;

    let report = SuiteDriver::new(registry)
        .echo(!cli.json)
        .run(&runner)
        .context("Test suite aborted")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        report.print_summary();
    }

    Ok(ExitCode::from(report.exit_code()))
}
