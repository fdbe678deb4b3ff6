//! OFTVG Test Harness
//!
//! This crate holds the checking side of the suite:
//!
//! - **Assertions**: exact and inclusive-range checks that record failures
//!   with their call site instead of panicking
//! - **Test cases**: scenarios that build a [`ParameterSet`](oftvg_spec::ParameterSet),
//!   run it through a [`RunTest`](oftvg_runner::RunTest) and check the report
//! - **Registry**: name-to-factory table the driver discovers cases from
//! - **Suite driver**: runs every registered case and aggregates the verdict
//!
//! ## Writing a scenario
//!
//! ```rust
//! use oftvg_harness::{check_eq, Assertions, CaseRegistry, TestCase};
//! use oftvg_runner::{RunTest, RunnerResult};
//! use oftvg_spec::{keys, ParameterSet};
//!
//! #[derive(Default)]
//! struct TestMatroska;
//!
//! impl TestCase for TestMatroska {
//!     fn run(&self, runner: &dyn RunTest, check: &mut Assertions) -> RunnerResult<()> {
//!         let r = runner.run_test(
//!             ParameterSet::new()
//!                 .with(keys::CONTAINER, "matroskamux")
//!                 .with(keys::OUTPUT, "output.mkv"),
//!         )?;
//!         check_eq!(check, r.demuxer, "matroskademux");
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = CaseRegistry::builtin();
//! registry
//!     .register("TestMatroska", oftvg_harness::boxed::<TestMatroska>)
//!     .unwrap();
//! assert_eq!(registry.len(), 4);
//! ```

pub mod assertion;
pub mod case;
pub mod scenarios;
pub mod suite;

pub use assertion::{AssertionRecord, Assertions, CallSite, Expectation};
pub use case::{boxed, CaseFactory, CaseRegistry, RegistryError, TestCase};
pub use scenarios::{TestBasicVideo, TestCalibrationPrepend, TestQuicktimeLipsync, BUILTIN_CASES};
pub use suite::{CaseOutcome, SuiteDriver, SuiteReport, SUMMARY_RULE};
