//! Test case trait and the registry the suite driver discovers cases from.

use oftvg_runner::{RunTest, RunnerResult};
use oftvg_spec::HarnessError;
use thiserror::Error;

use crate::assertion::Assertions;

/// One scenario: build parameters, run them, check the report.
///
/// `run` returns `Err` only for infrastructure failures, which abort the
/// suite. Check failures go into `check` and never stop the case early.
pub trait TestCase {
    fn run(&self, runner: &dyn RunTest, check: &mut Assertions) -> RunnerResult<()>;
}

/// Constructor stored in the registry.
pub type CaseFactory = fn() -> Box<dyn TestCase>;

/// Factory for any default-constructible case.
pub fn boxed<T: TestCase + Default + 'static>() -> Box<dyn TestCase> {
    Box::new(T::default())
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A case with this name is already registered.
    #[error("Test case already registered: {0}")]
    AlreadyRegistered(String),
    /// No case with this name is registered.
    #[error("Test case not found: {0}")]
    NotFound(String),
}

impl HarnessError for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            RegistryError::AlreadyRegistered(_) => "HARNESS_001",
            RegistryError::NotFound(_) => "HARNESS_002",
        }
    }

    fn category(&self) -> &'static str {
        "harness"
    }
}

/// Registered cases, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CaseRegistry {
    entries: Vec<(&'static str, CaseFactory)>,
}

impl CaseRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in scenario.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &(name, factory) in crate::scenarios::BUILTIN_CASES {
            // Names in the static list are unique.
            let _ = registry.register(name, factory);
        }
        registry
    }

    /// Registers a case under `name`.
    pub fn register(
        &mut self,
        name: &'static str,
        factory: CaseFactory,
    ) -> Result<(), RegistryError> {
        if self.contains(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        self.entries.push((name, factory));
        Ok(())
    }

    /// Returns true if a case is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    /// Gets the factory for `name`.
    pub fn get(&self, name: &str) -> Option<CaseFactory> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| *factory)
    }

    /// Lists registered names in run order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Iterates over `(name, factory)` pairs in run order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, CaseFactory)> + '_ {
        self.entries.iter().copied()
    }

    /// Returns a registry with only the named cases, keeping registration order.
    ///
    /// Fails on the first unknown name.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<CaseRegistry, RegistryError> {
        if let Some(unknown) = names.iter().find(|n| !self.contains(n.as_ref())) {
            return Err(RegistryError::NotFound(unknown.as_ref().to_string()));
        }

        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| names.iter().any(|n| n.as_ref() == *name))
            .copied()
            .collect();
        Ok(CaseRegistry { entries })
    }

    /// Returns the number of registered cases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no cases are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Noop;

    impl TestCase for Noop {
        fn run(&self, _runner: &dyn RunTest, _check: &mut Assertions) -> RunnerResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_new() {
        let registry = CaseRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = CaseRegistry::new();
        registry.register("TestNoop", boxed::<Noop>).unwrap();

        assert!(registry.contains("TestNoop"));
        assert!(registry.get("TestNoop").is_some());
        assert!(registry.get("TestOther").is_none());
    }

    #[test]
    fn test_registry_duplicate_name() {
        let mut registry = CaseRegistry::new();
        registry.register("TestNoop", boxed::<Noop>).unwrap();

        let result = registry.register("TestNoop", boxed::<Noop>);
        assert_eq!(
            result,
            Err(RegistryError::AlreadyRegistered("TestNoop".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_keeps_order() {
        let mut registry = CaseRegistry::new();
        registry.register("TestB", boxed::<Noop>).unwrap();
        registry.register("TestA", boxed::<Noop>).unwrap();
        registry.register("TestC", boxed::<Noop>).unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["TestB", "TestA", "TestC"]);
    }

    #[test]
    fn test_registry_select() {
        let mut registry = CaseRegistry::new();
        registry.register("TestB", boxed::<Noop>).unwrap();
        registry.register("TestA", boxed::<Noop>).unwrap();
        registry.register("TestC", boxed::<Noop>).unwrap();

        let selected = registry.select(&["TestC", "TestB"]).unwrap();
        let names: Vec<_> = selected.names().collect();
        assert_eq!(names, vec!["TestB", "TestC"]);

        let err = registry.select(&["TestD"]).unwrap_err();
        assert_eq!(err, RegistryError::NotFound("TestD".to_string()));
        assert_eq!(err.code(), "HARNESS_002");
        assert_eq!(err.category(), "harness");
    }

    #[test]
    fn test_builtin_registry() {
        let registry = CaseRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "TestBasicVideo",
                "TestCalibrationPrepend",
                "TestQuicktimeLipsync"
            ]
        );
    }
}
