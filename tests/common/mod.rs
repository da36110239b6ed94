//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use casebook::{CaseResult, CaseStatus, Registry, RunConfig, RunReport, Runner};

/// Runs `registry` with the default configuration.
pub fn run(registry: &Registry) -> RunReport {
    Runner::default().run(registry)
}

pub fn run_with(registry: &Registry, config: RunConfig) -> RunReport {
    Runner::new(config).run(registry)
}

/// Looks up a case result, panicking with a readable message when missing.
pub fn case<'r>(report: &'r RunReport, suite: &str, case: &str) -> &'r CaseResult {
    report
        .case(suite, case)
        .unwrap_or_else(|| panic!("no result for `{suite}` / `{case}`"))
}

pub fn status(report: &RunReport, suite: &str, name: &str) -> CaseStatus {
    case(report, suite, name).status
}

/// Absolute path of a file or directory under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Absolute path of the bundled `suites` directory.
pub fn bundled_suites() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("suites")
}
