//! Exact and range checks against analyzer reports.
//!
//! A failing check never panics and never returns an error. It prints a
//! diagnostic, records an [`AssertionRecord`] and sets the case's error flag,
//! then the case carries on with its next check.
//!
//! Use the [`check_eq!`](crate::check_eq) and
//! [`check_range!`](crate::check_range) macros rather than calling the
//! methods directly: they capture the call site and the source text of the
//! check.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Where a check was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
    /// Source text of the check.
    pub expr: &'static str,
}

impl CallSite {
    pub const fn new(
        file: &'static str,
        line: u32,
        module: &'static str,
        expr: &'static str,
    ) -> Self {
        Self {
            file,
            line,
            module,
            expr,
        }
    }
}

/// What a failed check expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// `actual == expected`.
    Exact { expected: String },
    /// `min <= actual <= max`.
    Range { min: String, max: String },
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Exact { expected } => write!(f, "expected {}", expected),
            Expectation::Range { min, max } => write!(f, "expected within [{}, {}]", min, max),
        }
    }
}

/// Diagnostic for one failed check. Values are `Debug`-rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionRecord {
    /// Test case the check belongs to.
    pub case: String,
    pub file: String,
    pub line: u32,
    pub module: String,
    pub expression: String,
    pub actual: String,
    pub expectation: Expectation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl fmt::Display for AssertionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:{} in {}", self.file, self.line, self.case)?;
        writeln!(f, "   {}", self.expression)?;
        write!(f, "   value is {}, {}", self.actual, self.expectation)?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

/// Per-case check state: the sticky error flag and the failures behind it.
#[derive(Debug, Clone)]
pub struct Assertions {
    case: String,
    errors: bool,
    checks: usize,
    failures: Vec<AssertionRecord>,
    echo: bool,
}

impl Assertions {
    /// Creates check state for `case` that prints failures as they happen.
    pub fn new(case: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            errors: false,
            checks: 0,
            failures: Vec::new(),
            echo: true,
        }
    }

    /// Creates check state that records failures without printing them.
    pub fn quiet(case: impl Into<String>) -> Self {
        Self {
            echo: false,
            ..Self::new(case)
        }
    }

    /// Name of the owning test case.
    pub fn case(&self) -> &str {
        &self.case
    }

    /// True once any check has failed. Never reset.
    pub fn errors(&self) -> bool {
        self.errors
    }

    /// Number of checks evaluated so far.
    pub fn checks(&self) -> usize {
        self.checks
    }

    /// Failed checks, in evaluation order.
    pub fn failures(&self) -> &[AssertionRecord] {
        &self.failures
    }

    /// Consumes the state and returns the failures.
    pub fn into_failures(self) -> Vec<AssertionRecord> {
        self.failures
    }

    /// Checks `actual == expected` (structural equality). Returns true on pass.
    pub fn assert_equals<A, E>(
        &mut self,
        site: CallSite,
        actual: &A,
        expected: &E,
        note: Option<String>,
    ) -> bool
    where
        A: PartialEq<E> + Debug + ?Sized,
        E: Debug + ?Sized,
    {
        self.checks += 1;
        if actual == expected {
            return true;
        }

        self.fail(
            site,
            format!("{:?}", actual),
            Expectation::Exact {
                expected: format!("{:?}", expected),
            },
            note,
        );
        false
    }

    /// Checks `min <= actual <= max`, both bounds inclusive. Returns true on pass.
    ///
    /// Values that do not compare (NaN) fail.
    pub fn assert_range<T>(
        &mut self,
        site: CallSite,
        actual: &T,
        min: &T,
        max: &T,
        note: Option<String>,
    ) -> bool
    where
        T: PartialOrd + Debug + ?Sized,
    {
        self.checks += 1;
        if min <= actual && actual <= max {
            return true;
        }

        self.fail(
            site,
            format!("{:?}", actual),
            Expectation::Range {
                min: format!("{:?}", min),
                max: format!("{:?}", max),
            },
            note,
        );
        false
    }

    fn fail(
        &mut self,
        site: CallSite,
        actual: String,
        expectation: Expectation,
        note: Option<String>,
    ) {
        let record = AssertionRecord {
            case: self.case.clone(),
            file: site.file.to_string(),
            line: site.line,
            module: site.module.to_string(),
            expression: site.expr.to_string(),
            actual,
            expectation,
            note,
        };

        if self.echo {
            print_failure(&record);
        }

        self.errors = true;
        self.failures.push(record);
    }
}

fn print_failure(record: &AssertionRecord) {
    println!(
        "{} {}:{} in {}",
        "FAIL".red().bold(),
        record.file,
        record.line,
        record.case
    );
    println!("   {}", record.expression.dimmed());
    print!("   value is {}, {}", record.actual.yellow(), record.expectation);
    match &record.note {
        Some(note) => println!(" ({})", note),
        None => println!(),
    }
}

/// Checks that two values are equal, recording a failure instead of panicking.
///
/// ```
/// use oftvg_harness::{check_eq, Assertions};
///
/// let mut check = Assertions::quiet("TestExample");
/// check_eq!(check, String::from("avidemux"), "avidemux");
/// check_eq!(check, 5, 6, "frame {}", 3);
/// assert!(check.errors());
/// assert_eq!(check.failures()[0].actual, "5");
/// ```
#[macro_export]
macro_rules! check_eq {
    ($checks:expr, $actual:expr, $expected:expr $(,)?) => {
        $checks.assert_equals(
            $crate::assertion::CallSite::new(
                file!(),
                line!(),
                module_path!(),
                concat!(stringify!($actual), " == ", stringify!($expected)),
            ),
            &$actual,
            &$expected,
            None,
        )
    };
    ($checks:expr, $actual:expr, $expected:expr, $($note:tt)+) => {
        $checks.assert_equals(
            $crate::assertion::CallSite::new(
                file!(),
                line!(),
                module_path!(),
                concat!(stringify!($actual), " == ", stringify!($expected)),
            ),
            &$actual,
            &$expected,
            Some(format!($($note)+)),
        )
    };
}

/// Checks that a value lies within inclusive bounds, recording a failure
/// instead of panicking.
///
/// ```
/// use oftvg_harness::{check_range, Assertions};
///
/// let mut check = Assertions::quiet("TestExample");
/// check_range!(check, 80, 80, 300);
/// check_range!(check, 0.3_f64, -1.0, 1.0);
/// assert!(!check.errors());
/// ```
#[macro_export]
macro_rules! check_range {
    ($checks:expr, $actual:expr, $min:expr, $max:expr $(,)?) => {
        $checks.assert_range(
            $crate::assertion::CallSite::new(
                file!(),
                line!(),
                module_path!(),
                concat!(
                    stringify!($min),
                    " <= ",
                    stringify!($actual),
                    " <= ",
                    stringify!($max)
                ),
            ),
            &$actual,
            &$min,
            &$max,
            None,
        )
    };
    ($checks:expr, $actual:expr, $min:expr, $max:expr, $($note:tt)+) => {
        $checks.assert_range(
            $crate::assertion::CallSite::new(
                file!(),
                line!(),
                module_path!(),
                concat!(
                    stringify!($min),
                    " <= ",
                    stringify!($actual),
                    " <= ",
                    stringify!($max)
                ),
            ),
            &$actual,
            &$min,
            &$max,
            Some(format!($($note)+)),
        )
    };
}
