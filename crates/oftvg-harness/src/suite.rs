//! Suite driver and aggregated results.

use colored::Colorize;
use oftvg_runner::{RunTest, RunnerResult};
use serde::{Deserialize, Serialize};

use crate::assertion::{AssertionRecord, Assertions};
use crate::case::CaseRegistry;

/// Rule printed above the final verdict.
pub const SUMMARY_RULE: &str = "===============";

/// Result of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub name: String,
    pub passed: bool,
    /// Checks evaluated, passing or not.
    pub checks: usize,
    #[serde(default)]
    pub failures: Vec<AssertionRecord>,
}

impl CaseOutcome {
    /// Builds the outcome from a finished case's check state.
    pub fn from_assertions(checks: Assertions) -> Self {
        let name = checks.case().to_string();
        let passed = !checks.errors();
        let count = checks.checks();
        Self {
            name,
            passed,
            checks: count,
            failures: checks.into_failures(),
        }
    }
}

/// Results of a suite run, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// True if no case failed.
    pub fn passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed).count()
    }

    pub fn total_count(&self) -> usize {
        self.cases.len()
    }

    /// Process exit status: 0 if every case passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Prints the closing banner.
    pub fn print_summary(&self) {
        println!("{}", SUMMARY_RULE);
        if self.passed() {
            println!("{}", "All tests ok".green().bold());
        } else {
            println!("{}", "Some tests failed!".red().bold());
        }
    }
}

/// Runs every case of a registry against one runner.
#[derive(Debug, Clone)]
pub struct SuiteDriver {
    registry: CaseRegistry,
    echo: bool,
}

impl SuiteDriver {
    /// Creates a driver that prints failures and per-case results.
    pub fn new(registry: CaseRegistry) -> Self {
        Self {
            registry,
            echo: true,
        }
    }

    /// Sets whether failures and per-case results are printed.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Runs each case once, in registration order.
    ///
    /// A runner error aborts the whole run; check failures never do.
    pub fn run(&self, runner: &dyn RunTest) -> RunnerResult<SuiteReport> {
        let mut report = SuiteReport::default();

        for (name, factory) in self.registry.iter() {
            let case = factory();
            let mut checks = if self.echo {
                Assertions::new(name)
            } else {
                Assertions::quiet(name)
            };

            case.run(runner, &mut checks)?;

            let outcome = CaseOutcome::from_assertions(checks);
            if self.echo {
                print_outcome(&outcome);
            }
            report.cases.push(outcome);
        }

        Ok(report)
    }
}

fn print_outcome(outcome: &CaseOutcome) {
    if outcome.passed {
        println!("{} {}", "PASS".green().bold(), outcome.name);
    } else {
        println!(
            "{} {} ({} failed checks)",
            "FAIL".red().bold(),
            outcome.name,
            outcome.failures.len()
        );
    }
}
