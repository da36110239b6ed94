//! Sequential, isolated execution of every registered case.
//!
//! Each case gets a fresh [`Assertions`] collector and is invoked exactly
//! once. Whatever escapes the body (an assertion failure, a fault, or a
//! panic) is classified and recorded, and execution moves on to the next
//! case. A failing case never prevents later cases from running.

use serde::Serialize;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::assertions::{panic_message, AssertionOutcome, Assertions, OutcomeSink};
use crate::errors::CaseError;
use crate::registry::{Case, CaseBody, CaseMode, Registry, Suite};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Knobs for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Per-case limit. When set, a case that runs longer is recorded as
    /// Errored with [`ErrorKind::Timeout`] and abandoned.
    pub timeout: Option<Duration>,
    /// Case-insensitive substring matched against suite and case names.
    pub filter: Option<String>,
}

// =============================================================================
// RESULT TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Errored,
    Skipped,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "PASS",
            CaseStatus::Failed => "FAIL",
            CaseStatus::Errored => "ERROR",
            CaseStatus::Skipped => "SKIP",
        }
    }
}

/// Why an Errored case stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnexpectedException,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseFault {
    pub kind: ErrorKind,
    pub message: String,
}

/// The recorded result of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub status: CaseStatus,
    pub outcomes: Vec<AssertionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CaseFault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl CaseResult {
    fn skipped(name: &str, reason: String) -> Self {
        Self {
            name: name.to_string(),
            status: CaseStatus::Skipped,
            outcomes: Vec::new(),
            error: None,
            skip_reason: Some(reason),
        }
    }

    /// The first failing assertion, if any.
    pub fn failure(&self) -> Option<&AssertionOutcome> {
        self.outcomes.iter().find(|outcome| !outcome.is_pass())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub cases: Vec<CaseResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }

    fn record(&mut self, status: CaseStatus) {
        match status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Failed => self.failed += 1,
            CaseStatus::Errored => self.errored += 1,
            CaseStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Everything one run produced, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    suites: Vec<SuiteReport>,
    counts: Counts,
    success: bool,
}

impl RunReport {
    pub fn new(suites: Vec<SuiteReport>) -> Self {
        let mut counts = Counts::default();
        for case in suites.iter().flat_map(|suite| suite.cases.iter()) {
            counts.record(case.status);
        }
        let success = counts.failed == 0 && counts.errored == 0;
        Self {
            suites,
            counts,
            success,
        }
    }

    pub fn suites(&self) -> &[SuiteReport] {
        &self.suites
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// True iff no case Failed or Errored.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Looks up a case result by suite and case name.
    pub fn case(&self, suite: &str, case: &str) -> Option<&CaseResult> {
        self.suites
            .iter()
            .find(|s| s.name == suite)
            .and_then(|s| s.cases.iter().find(|c| c.name == case))
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// What came back from invoking a body once.
struct Execution {
    assertions: Assertions,
    // `Err` holds the message of a panic that escaped the body.
    outcome: Result<Result<(), CaseError>, String>,
}

thread_local! {
    static IN_CASE: Cell<bool> = const { Cell::new(false) };
}

/// True while the current thread is running a case body.
pub fn inside_case() -> bool {
    IN_CASE.with(Cell::get)
}

fn execute(body: &CaseBody, mut assertions: Assertions) -> Execution {
    let was_inside = IN_CASE.with(|flag| flag.replace(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut assertions)))
        .map_err(|payload| panic_message(payload.as_ref()));
    IN_CASE.with(|flag| flag.set(was_inside));
    Execution {
        assertions,
        outcome,
    }
}

/// A case that could not report back: the fault plus whatever it recorded.
struct Abandoned {
    fault: CaseFault,
    outcomes: Vec<AssertionOutcome>,
}

/// Runs every case of a registry, one at a time.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run(&self, registry: &Registry) -> RunReport {
        let focused = registry.has_only();
        info!(
            suites = registry.suites().len(),
            cases = registry.case_count(),
            focused,
            "starting run"
        );

        let suites = registry
            .suites()
            .iter()
            .map(|suite| self.run_suite(suite, focused))
            .collect();
        let report = RunReport::new(suites);

        let counts = report.counts();
        info!(
            passed = counts.passed,
            failed = counts.failed,
            errored = counts.errored,
            skipped = counts.skipped,
            "run finished"
        );
        report
    }

    fn run_suite(&self, suite: &Suite, focused: bool) -> SuiteReport {
        debug!(suite = suite.name(), cases = suite.cases().len(), "running suite");
        let cases = suite
            .cases()
            .iter()
            .map(|case| match self.skip_reason(suite, case, focused) {
                Some(reason) => {
                    debug!(case = case.name(), %reason, "skipping case");
                    CaseResult::skipped(case.name(), reason)
                }
                None => self.run_case(suite, case),
            })
            .collect();
        SuiteReport {
            name: suite.name().to_string(),
            cases,
        }
    }

    fn skip_reason(&self, suite: &Suite, case: &Case, focused: bool) -> Option<String> {
        if case.mode() == CaseMode::Skip {
            return Some("marked skip".to_string());
        }
        if focused && case.mode() != CaseMode::Only {
            return Some("not marked only".to_string());
        }
        if let Some(filter) = &self.config.filter {
            let needle = filter.to_lowercase();
            let selected = suite.name().to_lowercase().contains(&needle)
                || case.name().to_lowercase().contains(&needle);
            if !selected {
                return Some(format!("filtered out by `{filter}`"));
            }
        }
        None
    }

    fn run_case(&self, suite: &Suite, case: &Case) -> CaseResult {
        let execution = match self.config.timeout {
            None => Ok(execute(case.body(), Assertions::new())),
            Some(limit) => execute_with_timeout(case, limit),
        };
        let result = match execution {
            Ok(execution) => classify(case.name(), execution),
            Err(Abandoned { fault, outcomes }) => CaseResult {
                name: case.name().to_string(),
                status: CaseStatus::Errored,
                outcomes,
                error: Some(fault),
                skip_reason: None,
            },
        };

        match result.status {
            CaseStatus::Errored => warn!(
                suite = suite.name(),
                case = case.name(),
                error = result.error.as_ref().map(|e| e.message.as_str()),
                "case errored"
            ),
            status => debug!(suite = suite.name(), case = case.name(), ?status, "case done"),
        }
        result
    }
}

/// Runs the body on a worker thread and waits at most `limit` for it.
///
/// Outcomes are mirrored into a shared sink, so a timed-out case still
/// reports every assertion it recorded before the limit.
fn execute_with_timeout(case: &Case, limit: Duration) -> Result<Execution, Abandoned> {
    let (tx, rx) = mpsc::channel();
    let sink: OutcomeSink = Arc::new(Mutex::new(Vec::new()));
    let assertions = Assertions::mirrored(Arc::clone(&sink));
    let body = CaseBody::clone(case.body());
    let spawned = thread::Builder::new()
        .name(format!("case:{}", case.name()))
        .spawn(move || {
            // The receiver is gone once the case timed out.
            let _ = tx.send(execute(&body, assertions));
        });
    if let Err(err) = spawned {
        return Err(Abandoned {
            fault: CaseFault {
                kind: ErrorKind::UnexpectedException,
                message: format!("failed to start case thread: {err}"),
            },
            outcomes: Vec::new(),
        });
    }

    let fault = match rx.recv_timeout(limit) {
        Ok(execution) => return Ok(execution),
        Err(RecvTimeoutError::Timeout) => CaseFault {
            kind: ErrorKind::Timeout,
            message: format!("case exceeded the {}ms timeout", limit.as_millis()),
        },
        Err(RecvTimeoutError::Disconnected) => CaseFault {
            kind: ErrorKind::UnexpectedException,
            message: "case thread exited without reporting".to_string(),
        },
    };
    let outcomes = sink
        .lock()
        .map(|recorded| recorded.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
    Err(Abandoned { fault, outcomes })
}

fn classify(name: &str, execution: Execution) -> CaseResult {
    let Execution {
        assertions,
        outcome,
    } = execution;
    let soft_failures = assertions.has_failures();
    let outcomes = assertions.into_outcomes();

    let (status, error) = match outcome {
        Err(panic) => (
            CaseStatus::Errored,
            Some(CaseFault {
                kind: ErrorKind::UnexpectedException,
                message: format!("panicked: {panic}"),
            }),
        ),
        Ok(Err(err)) if err.assertion().is_some() => (CaseStatus::Failed, None),
        Ok(Err(err)) => (
            CaseStatus::Errored,
            Some(CaseFault {
                kind: ErrorKind::UnexpectedException,
                message: format!("{err:#}"),
            }),
        ),
        Ok(Ok(())) if soft_failures => (CaseStatus::Failed, None),
        Ok(Ok(())) => (CaseStatus::Passed, None),
    };

    CaseResult {
        name: name.to_string(),
        status,
        outcomes,
        error,
        skip_reason: None,
    }
}
