mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use casebook::runner::inside_case;
use casebook::{CaseError, CaseStatus, ErrorKind, OutcomeKind, Registry, RunConfig};
use common::{case, run, run_with, status};
use pretty_assertions::assert_eq;

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn clean_body_passes() {
    let mut registry = Registry::new();
    registry
        .suite("arithmetic", |s| {
            s.case("adds", |t| Ok(t.assert_equal(1 + 2, 3)?))?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    assert_eq!(status(&report, "arithmetic", "adds"), CaseStatus::Passed);
    assert!(report.success());
}

#[test]
fn throwing_callable_satisfies_assert_throws() {
    let mut registry = Registry::new();
    registry
        .suite("throws", |s| {
            s.case("error with matching message", |t| {
                t.assert_throws_matching(|| -> Result<(), String> { Err("x".to_string()) }, "x")?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    assert_eq!(
        status(&report, "throws", "error with matching message"),
        CaseStatus::Passed
    );
}

#[test]
fn callable_that_completes_fails_assert_throws() {
    let mut registry = Registry::new();
    registry
        .suite("throws", |s| {
            s.case("no error", |t| {
                t.assert_throws(|| -> Result<(), String> { Ok(()) })?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    let result = case(&report, "throws", "no error");
    assert_eq!(result.status, CaseStatus::Failed);
    let failure = result.failure().unwrap();
    assert_eq!(failure.subject(), "assert_throws");
    assert_eq!(
        failure.message(),
        Some("expected the callable to throw, but it completed normally")
    );
    assert!(!report.success());
}

#[test]
fn unrelated_error_is_errored_and_next_case_still_runs() {
    let mut registry = Registry::new();
    registry
        .suite("A", |s| {
            s.case("c1", |_| Err(CaseError::fault("lookup table missing")))?
                .case("c2", |t| Ok(t.assert_truthy(true)?))?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    let c1 = case(&report, "A", "c1");
    assert_eq!(c1.status, CaseStatus::Errored);
    let fault = c1.error.as_ref().unwrap();
    assert_eq!(fault.kind, ErrorKind::UnexpectedException);
    assert_eq!(fault.message, "lookup table missing");
    assert_eq!(status(&report, "A", "c2"), CaseStatus::Passed);
    assert!(!report.success());
}

#[test]
fn zero_and_false_are_not_strictly_equal() {
    let mut registry = Registry::new();
    registry
        .suite("tags", |s| {
            s.case("zero vs false", |t| {
                t.assert_falsy(0)?;
                t.assert_falsy(false)?;
                t.assert_strict_equal(0, false)?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    let result = case(&report, "tags", "zero vs false");
    assert_eq!(result.status, CaseStatus::Failed);
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(
        result.failure().unwrap().message(),
        Some("type tags differ: number vs boolean")
    );
}

#[test]
fn panics_are_errored_with_their_message() {
    let mut registry = Registry::new();
    registry
        .suite("panics", |s| {
            s.case("index out of bounds", |t| {
                let items: Vec<i32> = Vec::new();
                let position = items.len() + 2;
                t.assert_same(items[position], 0)?;
                Ok(())
            })?
            .case("explicit", |_| panic!("boom"))?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    assert_eq!(
        status(&report, "panics", "index out of bounds"),
        CaseStatus::Errored
    );
    let explicit = case(&report, "panics", "explicit");
    assert_eq!(explicit.status, CaseStatus::Errored);
    assert_eq!(explicit.error.as_ref().unwrap().message, "panicked: boom");
}

#[test]
fn assertion_failure_wrapped_in_anyhow_is_still_failed() {
    let mut registry = Registry::new();
    registry
        .suite("wrapped", |s| {
            s.case("context on an assertion", |t| {
                t.assert_equal("left", "right")
                    .context("comparing sides")?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    let result = case(&report, "wrapped", "context on an assertion");
    assert_eq!(result.status, CaseStatus::Failed);
    assert!(result.error.is_none());
}

#[test]
fn swallowed_assertion_failure_still_fails_the_case() {
    let mut registry = Registry::new();
    registry
        .suite("soft", |s| {
            s.case("ignores the result", |t| {
                let _ = t.assert_equal(1, 2);
                t.assert_truthy("keeps going")?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    let result = case(&report, "soft", "ignores the result");
    assert_eq!(result.status, CaseStatus::Failed);
    assert_eq!(result.outcomes.len(), 2);
    assert!(result.outcomes[1].is_pass());
}

// =============================================================================
// ISOLATION AND ORDER
// =============================================================================

#[test]
fn cases_get_fresh_collectors() {
    let mut registry = Registry::new();
    registry
        .suite("isolation", |s| {
            s.case("first records two", |t| {
                t.assert_truthy(1)?;
                t.assert_truthy(2)?;
                Ok(())
            })?
            .case("second sees none of them", |t| {
                let before = t.outcomes().len();
                t.assert_same(before, 0)?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    assert_eq!(case(&report, "isolation", "first records two").outcomes.len(), 2);
    assert_eq!(
        status(&report, "isolation", "second sees none of them"),
        CaseStatus::Passed
    );
}

#[test]
fn each_case_runs_exactly_once_in_declaration_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    let suite = registry.declare_suite("order").unwrap();
    for name in ["one", "two", "three"] {
        let calls = Arc::clone(&calls);
        registry
            .declare_case(suite, name, move |t| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(t.assert_truthy(name)?)
            })
            .unwrap();
    }

    let report = run(&registry);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let names: Vec<_> = report.suites()[0]
        .cases
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["one", "two", "three"]);
}

#[test]
fn identical_inputs_give_identical_reports() {
    let build = || {
        let mut registry = Registry::new();
        casebook::catalog::register_builtin(&mut registry).unwrap();
        registry
            .suite("mixed", |s| {
                s.case("fails", |t| Ok(t.assert_equal(casebook::array![1, 2], casebook::array![2, 1])?))?
                    .case("errors", |_| Err(CaseError::fault("nope")))?
                    .skip("skipped", |_| Ok(()))?;
                Ok(())
            })
            .unwrap();
        registry
    };

    let first = run(&build());
    let second = run(&build());
    assert_eq!(first, second);
}

// =============================================================================
// SKIP, ONLY, FILTER, TIMEOUT
// =============================================================================

#[test]
fn skipped_cases_do_not_run_or_affect_success() {
    let mut registry = Registry::new();
    registry
        .suite("modes", |s| {
            s.case("runs", |t| Ok(t.assert_truthy(true)?))?
                .skip("parked", |_| panic!("skipped bodies never run"))?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    let parked = case(&report, "modes", "parked");
    assert_eq!(parked.status, CaseStatus::Skipped);
    assert_eq!(parked.skip_reason.as_deref(), Some("marked skip"));
    assert!(report.success());
    assert_eq!(report.counts().skipped, 1);
}

#[test]
fn only_mode_focuses_across_suites() {
    let mut registry = Registry::new();
    registry
        .suite("first", |s| {
            s.case("unfocused", |_| Err(CaseError::fault("should not run")))?;
            Ok(())
        })
        .unwrap();
    registry
        .suite("second", |s| {
            s.only("focused", |t| Ok(t.assert_truthy(1)?))?;
            Ok(())
        })
        .unwrap();

    let report = run(&registry);
    assert_eq!(status(&report, "first", "unfocused"), CaseStatus::Skipped);
    assert_eq!(
        case(&report, "first", "unfocused").skip_reason.as_deref(),
        Some("not marked only")
    );
    assert_eq!(status(&report, "second", "focused"), CaseStatus::Passed);
    assert!(report.success());
}

#[test]
fn filter_matches_suite_or_case_name_case_insensitively() {
    let mut registry = Registry::new();
    registry
        .suite("Enums", |s| {
            s.case("numeric", |t| Ok(t.assert_truthy(1)?))?;
            Ok(())
        })
        .unwrap();
    registry
        .suite("Classes", |s| {
            s.case("enum-like constants", |t| Ok(t.assert_truthy(1)?))?
                .case("accessors", |t| Ok(t.assert_truthy(1)?))?;
            Ok(())
        })
        .unwrap();

    let config = RunConfig {
        filter: Some("ENUM".to_string()),
        ..RunConfig::default()
    };
    let report = run_with(&registry, config);
    assert_eq!(status(&report, "Enums", "numeric"), CaseStatus::Passed);
    assert_eq!(
        status(&report, "Classes", "enum-like constants"),
        CaseStatus::Passed
    );
    let filtered = case(&report, "Classes", "accessors");
    assert_eq!(filtered.status, CaseStatus::Skipped);
    assert_eq!(filtered.skip_reason.as_deref(), Some("filtered out by `ENUM`"));
}

#[test]
fn timeout_errors_the_case_and_the_run_moves_on() {
    let mut registry = Registry::new();
    registry
        .suite("slow", |s| {
            s.case("sleeps", |t| {
                thread::sleep(Duration::from_millis(500));
                Ok(t.assert_truthy(true)?)
            })?
            .case("quick", |t| Ok(t.assert_truthy(true)?))?;
            Ok(())
        })
        .unwrap();

    let config = RunConfig {
        timeout: Some(Duration::from_millis(50)),
        ..RunConfig::default()
    };
    let report = run_with(&registry, config);
    let slow = case(&report, "slow", "sleeps");
    assert_eq!(slow.status, CaseStatus::Errored);
    let fault = slow.error.as_ref().unwrap();
    assert_eq!(fault.kind, ErrorKind::Timeout);
    assert_eq!(fault.message, "case exceeded the 50ms timeout");
    assert_eq!(status(&report, "slow", "quick"), CaseStatus::Passed);
}

#[test]
fn timeout_keeps_outcomes_of_cases_that_finish() {
    let mut registry = Registry::new();
    registry
        .suite("bounded", |s| {
            s.case("fails quickly", |t| Ok(t.assert_equal(1, 2)?))?;
            Ok(())
        })
        .unwrap();

    let config = RunConfig {
        timeout: Some(Duration::from_secs(5)),
        ..RunConfig::default()
    };
    let report = run_with(&registry, config);
    let result = case(&report, "bounded", "fails quickly");
    assert_eq!(result.status, CaseStatus::Failed);
    assert_eq!(result.outcomes.len(), 1);
}

#[test]
fn timed_out_case_reports_what_it_recorded() {
    let mut registry = Registry::new();
    registry
        .suite("slow", |s| {
            s.case("records then stalls", |t| {
                t.assert_truthy(true)?;
                let _ = t.assert_equal(1, 2);
                thread::sleep(Duration::from_millis(500));
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let config = RunConfig {
        timeout: Some(Duration::from_millis(50)),
        ..RunConfig::default()
    };
    let report = run_with(&registry, config);
    let stalled = case(&report, "slow", "records then stalls");
    assert_eq!(stalled.status, CaseStatus::Errored);
    assert_eq!(stalled.error.as_ref().unwrap().kind, ErrorKind::Timeout);
    let kinds: Vec<_> = stalled.outcomes.iter().map(|o| o.kind()).collect();
    assert_eq!(kinds, [OutcomeKind::Pass, OutcomeKind::Fail]);
}

#[test]
fn bodies_know_they_run_inside_a_case() {
    let mut registry = Registry::new();
    registry
        .suite("context", |s| {
            s.case("inline", |t| Ok(t.assert_truthy(inside_case())?))?;
            Ok(())
        })
        .unwrap();
    registry
        .suite("threaded", |s| {
            s.case("worker", |t| Ok(t.assert_truthy(inside_case())?))?;
            Ok(())
        })
        .unwrap();

    assert!(!inside_case());
    assert!(run(&registry).success());
    let config = RunConfig {
        timeout: Some(Duration::from_secs(5)),
        ..RunConfig::default()
    };
    assert!(run_with(&registry, config).success());
    assert!(!inside_case());
}
