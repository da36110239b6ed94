//! # Suite and case registration
//!
//! The registry is an append-only, ordered collection of suites, each holding
//! its cases in declaration order. Bodies are stored as opaque shared
//! closures and are never invoked here.
//!
//! Registry invariant: once a run starts the registry is only read. All
//! registration errors are raised before the runner sees it.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::assertions::Assertions;
use crate::errors::{CaseError, HarnessError, Result};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// What a case body returns.
pub type BodyResult = std::result::Result<(), CaseError>;

/// A case body: zero-argument logic that receives its own assertion collector.
pub type CaseBody = Arc<dyn Fn(&mut Assertions) -> BodyResult + Send + Sync + 'static>;

/// Whether a case runs normally, is skipped, or is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    #[default]
    Run,
    Skip,
    Only,
}

/// A single named example.
pub struct Case {
    name: String,
    mode: CaseMode,
    body: CaseBody,
}

impl Case {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> CaseMode {
        self.mode
    }

    pub fn body(&self) -> &CaseBody {
        &self.body
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// A named, ordered group of cases.
#[derive(Debug)]
pub struct Suite {
    name: String,
    cases: Vec<Case>,
}

impl Suite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

/// Opaque reference to a suite declared in a specific [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteHandle {
    registry: u64,
    index: usize,
}

/// Ordered, append-only store of suite and case declarations.
///
/// # Example
/// ```
/// use casebook::registry::Registry;
///
/// let mut registry = Registry::new();
/// let arithmetic = registry.declare_suite("arithmetic").unwrap();
/// registry
///     .declare_case(arithmetic, "adds", |t| Ok(t.assert_equal(1 + 2, 3)?))
///     .unwrap();
/// assert_eq!(registry.case_count(), 1);
/// ```
#[derive(Debug)]
pub struct Registry {
    id: u64,
    suites: Vec<Suite>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            suites: Vec::new(),
        }
    }

    /// Declares a new suite. Names must be unique within the registry.
    pub fn declare_suite(&mut self, name: impl Into<String>) -> Result<SuiteHandle> {
        let name = name.into();
        if self.suites.iter().any(|suite| suite.name == name) {
            return Err(HarnessError::DuplicateSuiteName { name });
        }
        self.suites.push(Suite {
            name,
            cases: Vec::new(),
        });
        Ok(SuiteHandle {
            registry: self.id,
            index: self.suites.len() - 1,
        })
    }

    /// Appends a case to `suite`.
    pub fn declare_case<F>(
        &mut self,
        suite: SuiteHandle,
        name: impl Into<String>,
        body: F,
    ) -> Result<()>
    where
        F: Fn(&mut Assertions) -> BodyResult + Send + Sync + 'static,
    {
        self.declare_case_with(suite, name, CaseMode::Run, body)
    }

    /// Appends a case with an explicit [`CaseMode`].
    pub fn declare_case_with<F>(
        &mut self,
        suite: SuiteHandle,
        name: impl Into<String>,
        mode: CaseMode,
        body: F,
    ) -> Result<()>
    where
        F: Fn(&mut Assertions) -> BodyResult + Send + Sync + 'static,
    {
        let name = name.into();
        let target = self.suite_mut(suite)?;
        if target.cases.iter().any(|case| case.name == name) {
            return Err(HarnessError::DuplicateCaseName {
                suite: target.name.clone(),
                case: name,
            });
        }
        target.cases.push(Case {
            name,
            mode,
            body: Arc::new(body),
        });
        Ok(())
    }

    /// Declares a suite and fills it within `declare`, mirroring the nesting
    /// of `describe`/`it` blocks.
    pub fn suite<F>(&mut self, name: impl Into<String>, declare: F) -> Result<SuiteHandle>
    where
        F: FnOnce(&mut SuiteScope<'_>) -> Result<()>,
    {
        let handle = self.declare_suite(name)?;
        let mut scope = SuiteScope {
            registry: self,
            handle,
        };
        declare(&mut scope)?;
        Ok(handle)
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|suite| suite.cases.len()).sum()
    }

    /// True if any case anywhere is focused with [`CaseMode::Only`].
    pub fn has_only(&self) -> bool {
        self.suites
            .iter()
            .flat_map(|suite| suite.cases.iter())
            .any(|case| case.mode == CaseMode::Only)
    }

    fn suite_mut(&mut self, handle: SuiteHandle) -> Result<&mut Suite> {
        if handle.registry != self.id {
            return Err(HarnessError::UnknownSuite {
                index: handle.index,
            });
        }
        self.suites
            .get_mut(handle.index)
            .ok_or(HarnessError::UnknownSuite {
                index: handle.index,
            })
    }
}

/// Scoped access to one suite while it is being declared.
pub struct SuiteScope<'r> {
    registry: &'r mut Registry,
    handle: SuiteHandle,
}

impl SuiteScope<'_> {
    pub fn handle(&self) -> SuiteHandle {
        self.handle
    }

    pub fn case<F>(&mut self, name: impl Into<String>, body: F) -> Result<&mut Self>
    where
        F: Fn(&mut Assertions) -> BodyResult + Send + Sync + 'static,
    {
        self.registry.declare_case(self.handle, name, body)?;
        Ok(self)
    }

    pub fn skip<F>(&mut self, name: impl Into<String>, body: F) -> Result<&mut Self>
    where
        F: Fn(&mut Assertions) -> BodyResult + Send + Sync + 'static,
    {
        self.registry
            .declare_case_with(self.handle, name, CaseMode::Skip, body)?;
        Ok(self)
    }

    pub fn only<F>(&mut self, name: impl Into<String>, body: F) -> Result<&mut Self>
    where
        F: Fn(&mut Assertions) -> BodyResult + Send + Sync + 'static,
    {
        self.registry
            .declare_case_with(self.handle, name, CaseMode::Only, body)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Assertions) -> BodyResult {
        Ok(())
    }

    #[test]
    fn suites_and_cases_keep_declaration_order() {
        let mut registry = Registry::new();
        let b = registry.declare_suite("b").unwrap();
        let a = registry.declare_suite("a").unwrap();
        registry.declare_case(a, "second", noop).unwrap();
        registry.declare_case(a, "first", noop).unwrap();
        registry.declare_case(b, "only one", noop).unwrap();

        let names: Vec<_> = registry.suites().iter().map(Suite::name).collect();
        assert_eq!(names, ["b", "a"]);
        let cases: Vec<_> = registry.suites()[1].cases().iter().map(Case::name).collect();
        assert_eq!(cases, ["second", "first"]);
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut first = Registry::new();
        let mut second = Registry::new();
        let handle = first.declare_suite("suite").unwrap();
        second.declare_suite("suite").unwrap();
        let err = second.declare_case(handle, "case", noop).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownSuite { index: 0 }));
    }

    #[test]
    fn only_mode_is_detected() {
        let mut registry = Registry::new();
        registry
            .suite("focused", |s| {
                s.case("plain", noop)?.only("focused", noop)?;
                Ok(())
            })
            .unwrap();
        assert!(registry.has_only());
        assert_eq!(registry.suites()[0].cases()[1].mode(), CaseMode::Only);
    }
}
