//! Error types for registration, discovery, and case execution.
//!
//! Two channels are kept apart:
//!
//! - [`HarnessError`] is fatal to a run. Registration and discovery errors
//!   surface here and abort before any case executes. It derives
//!   [`miette::Diagnostic`] so the CLI can render codes, help, and source
//!   labels.
//! - [`CaseError`] is what a case body returns. Its `Assertion` variant means
//!   an expectation did not hold (the case is Failed); its `Fault` variant is
//!   anything else (the case is Errored).

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fmt;
use thiserror::Error;

use crate::assertions::AssertionOutcome;

/// Fatal errors raised while assembling or reporting a run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("suite `{name}` is already declared")]
    #[diagnostic(
        code(casebook::registry::duplicate_suite),
        help("suite names must be unique within a run; rename one of the suites")
    )]
    DuplicateSuiteName { name: String },

    #[error("case `{case}` is already declared in suite `{suite}`")]
    #[diagnostic(
        code(casebook::registry::duplicate_case),
        help("case names must be unique within their suite")
    )]
    DuplicateCaseName { suite: String, case: String },

    #[error("suite handle #{index} does not belong to this registry")]
    #[diagnostic(code(casebook::registry::unknown_suite))]
    UnknownSuite { index: usize },

    #[error("failed to read `{path}`")]
    #[diagnostic(code(casebook::discovery::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk `{root}`")]
    #[diagnostic(code(casebook::discovery::walk))]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("malformed suite file: {message}")]
    #[diagnostic(code(casebook::discovery::malformed))]
    MalformedSuite {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        #[help]
        help: Option<String>,
    },

    #[error("failed to write the report")]
    #[diagnostic(code(casebook::report::write))]
    Report {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize the report")]
    #[diagnostic(code(casebook::report::json))]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

/// An assertion that did not hold, carrying the outcome that recorded it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionFailure {
    outcome: AssertionOutcome,
}

impl AssertionFailure {
    pub(crate) fn new(outcome: AssertionOutcome) -> Self {
        Self { outcome }
    }

    pub fn outcome(&self) -> &AssertionOutcome {
        &self.outcome
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subject = self.outcome.subject();
        match self.outcome.message() {
            Some(message) => write!(f, "{subject}: {message}"),
            None => write!(f, "{subject} failed"),
        }
    }
}

impl std::error::Error for AssertionFailure {}

/// What a case body may return.
///
/// `?` works on assertion results and on [`anyhow::Result`], so bodies can
/// use `anyhow::Context` for their own fallible steps.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl CaseError {
    /// Builds a fault from a plain message.
    pub fn fault(message: impl fmt::Display) -> Self {
        CaseError::Fault(anyhow::anyhow!("{message}"))
    }

    /// The assertion failure behind this error, if any. A fault that merely
    /// wraps an assertion failure still counts.
    pub fn assertion(&self) -> Option<&AssertionFailure> {
        match self {
            CaseError::Assertion(failure) => Some(failure),
            CaseError::Fault(err) => err.downcast_ref::<AssertionFailure>(),
        }
    }
}
