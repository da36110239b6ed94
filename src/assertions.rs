//! The per-case assertion collector.
//!
//! Every assertion records exactly one [`AssertionOutcome`]. A passing
//! assertion returns `Ok(())`; a failing one returns the failure so the body
//! can stop with `?`, or ignore it and keep going. Either way the outcome is
//! already recorded and the runner will see it.

use regex::Regex;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use crate::errors::AssertionFailure;
use crate::value::Value;

/// Result of a single assertion.
pub type Check = Result<(), AssertionFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Pass,
    Fail,
}

/// One recorded comparison. Fields are read-only once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionOutcome {
    kind: OutcomeKind,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AssertionOutcome {
    fn pass(subject: &str, expected: Option<String>, actual: Option<String>) -> Self {
        Self {
            kind: OutcomeKind::Pass,
            subject: subject.to_string(),
            expected,
            actual,
            message: None,
        }
    }

    fn fail(
        subject: &str,
        message: impl Into<String>,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        Self {
            kind: OutcomeKind::Fail,
            subject: subject.to_string(),
            expected,
            actual,
            message: Some(message.into()),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn is_pass(&self) -> bool {
        self.kind == OutcomeKind::Pass
    }

    /// Name of the assertion that produced this outcome, e.g. `assert_equal`.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// What an error message must look like for `assert_throws_matching`.
#[derive(Debug, Clone)]
pub enum MessagePattern {
    Contains(String),
    Regex(Regex),
}

impl MessagePattern {
    pub fn matches(&self, message: &str) -> bool {
        match self {
            MessagePattern::Contains(needle) => message.contains(needle.as_str()),
            MessagePattern::Regex(re) => re.is_match(message),
        }
    }
}

impl fmt::Display for MessagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePattern::Contains(needle) => write!(f, "{needle:?}"),
            MessagePattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<&str> for MessagePattern {
    fn from(needle: &str) -> Self {
        MessagePattern::Contains(needle.to_string())
    }
}

impl From<String> for MessagePattern {
    fn from(needle: String) -> Self {
        MessagePattern::Contains(needle)
    }
}

impl From<Regex> for MessagePattern {
    fn from(re: Regex) -> Self {
        MessagePattern::Regex(re)
    }
}

/// Extracts the message carried by a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Outcomes shared with another thread while a case is still running.
pub(crate) type OutcomeSink = Arc<Mutex<Vec<AssertionOutcome>>>;

/// Collects assertion outcomes for one case invocation.
#[derive(Debug, Default)]
pub struct Assertions {
    outcomes: Vec<AssertionOutcome>,
    mirror: Option<OutcomeSink>,
}

impl Assertions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collector that also copies every outcome into `sink`, so the
    /// outcomes survive a case that never returns.
    pub(crate) fn mirrored(sink: OutcomeSink) -> Self {
        Self {
            outcomes: Vec::new(),
            mirror: Some(sink),
        }
    }

    pub fn outcomes(&self) -> &[AssertionOutcome] {
        &self.outcomes
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|outcome| !outcome.is_pass())
    }

    pub(crate) fn into_outcomes(self) -> Vec<AssertionOutcome> {
        self.outcomes
    }

    fn record(&mut self, outcome: AssertionOutcome) -> Check {
        let failed = !outcome.is_pass();
        if let Some(sink) = &self.mirror {
            sink.lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(outcome.clone());
        }
        self.outcomes.push(outcome.clone());
        if failed {
            Err(AssertionFailure::new(outcome))
        } else {
            Ok(())
        }
    }

    fn compare(
        &mut self,
        subject: &str,
        actual: &Value,
        expected: &Value,
        holds: bool,
        message: impl Into<String>,
    ) -> Check {
        let shown_expected = Some(expected.pretty());
        let shown_actual = Some(actual.pretty());
        let outcome = if holds {
            AssertionOutcome::pass(subject, shown_expected, shown_actual)
        } else {
            AssertionOutcome::fail(subject, message, shown_expected, shown_actual)
        };
        self.record(outcome)
    }

    fn predicate(&mut self, subject: &str, actual: &Value, expectation: &str, holds: bool) -> Check {
        let shown_actual = Some(actual.pretty());
        let outcome = if holds {
            AssertionOutcome::pass(subject, Some(expectation.to_string()), shown_actual)
        } else {
            AssertionOutcome::fail(
                subject,
                format!("expected {expectation}, got {actual}"),
                Some(expectation.to_string()),
                shown_actual,
            )
        };
        self.record(outcome)
    }

    /// Deep structural equality. Sequences compare in order, object keys in
    /// any order; class tags and `undefined` properties are ignored.
    pub fn assert_equal(&mut self, actual: impl Into<Value>, expected: impl Into<Value>) -> Check {
        let (actual, expected) = (actual.into(), expected.into());
        let holds = actual.loose_equals(&expected);
        self.compare(
            "assert_equal",
            &actual,
            &expected,
            holds,
            "values are not structurally equal",
        )
    }

    /// Like [`Assertions::assert_equal`], but type tags must match at every
    /// level, class tags and `undefined` properties included.
    pub fn assert_strict_equal(
        &mut self,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
    ) -> Check {
        let (actual, expected) = (actual.into(), expected.into());
        let holds = actual.strict_equals(&expected);
        let message = if actual.type_tag() != expected.type_tag() {
            format!(
                "type tags differ: {} vs {}",
                actual.type_tag(),
                expected.type_tag()
            )
        } else {
            "values are not strictly equal".to_string()
        };
        self.compare("assert_strict_equal", &actual, &expected, holds, message)
    }

    /// SameValue: primitives by value, symbols and composites by identity.
    pub fn assert_same(&mut self, actual: impl Into<Value>, expected: impl Into<Value>) -> Check {
        let (actual, expected) = (actual.into(), expected.into());
        let holds = actual.same_value(&expected);
        let message = if actual.strict_equals(&expected) {
            "values are equal but not the same reference"
        } else {
            "values are not the same"
        };
        self.compare("assert_same", &actual, &expected, holds, message)
    }

    /// Every property of `subset` must be present on `actual` and match.
    pub fn assert_match_object(
        &mut self,
        actual: impl Into<Value>,
        subset: impl Into<Value>,
    ) -> Check {
        let (actual, subset) = (actual.into(), subset.into());
        let holds = actual.matches_subset(&subset);
        self.compare(
            "assert_match_object",
            &actual,
            &subset,
            holds,
            "value does not match the expected subset",
        )
    }

    pub fn assert_truthy(&mut self, actual: impl Into<Value>) -> Check {
        let actual = actual.into();
        let holds = actual.is_truthy();
        self.predicate("assert_truthy", &actual, "a truthy value", holds)
    }

    pub fn assert_falsy(&mut self, actual: impl Into<Value>) -> Check {
        let actual = actual.into();
        let holds = !actual.is_truthy();
        self.predicate("assert_falsy", &actual, "a falsy value", holds)
    }

    pub fn assert_undefined(&mut self, actual: impl Into<Value>) -> Check {
        let actual = actual.into();
        let holds = actual.is_undefined();
        self.predicate("assert_undefined", &actual, "undefined", holds)
    }

    pub fn assert_not_undefined(&mut self, actual: impl Into<Value>) -> Check {
        let actual = actual.into();
        let holds = !actual.is_undefined();
        self.predicate("assert_not_undefined", &actual, "a defined value", holds)
    }

    pub fn assert_null(&mut self, actual: impl Into<Value>) -> Check {
        let actual = actual.into();
        let holds = actual.is_null();
        self.predicate("assert_null", &actual, "null", holds)
    }

    pub fn assert_not_null(&mut self, actual: impl Into<Value>) -> Check {
        let actual = actual.into();
        let holds = !actual.is_null();
        self.predicate("assert_not_null", &actual, "a non-null value", holds)
    }

    /// The value must be a string matching `pattern`.
    pub fn assert_matches(
        &mut self,
        actual: impl Into<Value>,
        pattern: impl Into<MessagePattern>,
    ) -> Check {
        let (actual, pattern) = (actual.into(), pattern.into());
        let expected = Some(pattern.to_string());
        let shown_actual = Some(actual.pretty());
        let outcome = match actual.as_str() {
            Some(text) if pattern.matches(text) => {
                AssertionOutcome::pass("assert_matches", expected, shown_actual)
            }
            Some(_) => AssertionOutcome::fail(
                "assert_matches",
                format!("string does not match {pattern}"),
                expected,
                shown_actual,
            ),
            None => AssertionOutcome::fail(
                "assert_matches",
                format!("expected a string, got {}", actual.type_tag()),
                expected,
                shown_actual,
            ),
        };
        self.record(outcome)
    }

    /// Passes iff `callable` returns `Err` or panics.
    pub fn assert_throws<T, E, F>(&mut self, callable: F) -> Check
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        self.check_throws("assert_throws", callable, None)
    }

    /// Passes iff `callable` returns `Err` or panics with a message matching
    /// `pattern`.
    pub fn assert_throws_matching<T, E, F>(
        &mut self,
        callable: F,
        pattern: impl Into<MessagePattern>,
    ) -> Check
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        self.check_throws("assert_throws_matching", callable, Some(pattern.into()))
    }

    fn check_throws<T, E, F>(
        &mut self,
        subject: &str,
        callable: F,
        pattern: Option<MessagePattern>,
    ) -> Check
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        let thrown = match panic::catch_unwind(AssertUnwindSafe(callable)) {
            Ok(Ok(_)) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };
        let expected = Some(match &pattern {
            Some(pattern) => format!("an error matching {pattern}"),
            None => "an error".to_string(),
        });
        let outcome = match (thrown, &pattern) {
            (None, _) => AssertionOutcome::fail(
                subject,
                "expected the callable to throw, but it completed normally",
                expected,
                Some("no error".to_string()),
            ),
            (Some(message), Some(pattern)) if !pattern.matches(&message) => {
                AssertionOutcome::fail(
                    subject,
                    format!("thrown message does not match {pattern}"),
                    expected,
                    Some(message),
                )
            }
            (Some(message), _) => AssertionOutcome::pass(subject, expected, Some(message)),
        };
        self.record(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{array, object};

    #[test]
    fn every_assertion_records_one_outcome() {
        let mut t = Assertions::new();
        assert!(t.assert_equal(1 + 2, 3).is_ok());
        assert!(t.assert_truthy("x").is_ok());
        assert!(t.assert_null(Value::Undefined).is_err());
        assert_eq!(t.outcomes().len(), 3);
        assert!(t.has_failures());
    }

    #[test]
    fn failure_carries_expected_and_actual() {
        let mut t = Assertions::new();
        let failure = t.assert_equal(array![1, 2], array![2, 1]).unwrap_err();
        let outcome = failure.outcome();
        assert_eq!(outcome.subject(), "assert_equal");
        assert_eq!(outcome.expected(), Some("[\n  2,\n  1\n]"));
        assert_eq!(outcome.actual(), Some("[\n  1,\n  2\n]"));
        assert_eq!(
            failure.to_string(),
            "assert_equal: values are not structurally equal"
        );
    }

    #[test]
    fn strict_equal_reports_type_tags() {
        let mut t = Assertions::new();
        let failure = t.assert_strict_equal(0, false).unwrap_err();
        assert_eq!(
            failure.outcome().message(),
            Some("type tags differ: number vs boolean")
        );
    }

    #[test]
    fn throws_accepts_errors_and_panics() {
        let mut t = Assertions::new();
        assert!(t
            .assert_throws_matching(|| Err::<(), _>("bad input"), "bad")
            .is_ok());
        assert!(t
            .assert_throws(|| -> Result<(), String> { panic!("boom") })
            .is_ok());
        assert!(t.assert_throws(|| Ok::<_, String>(())).is_err());
        assert!(t
            .assert_throws_matching(|| Err::<(), _>("other"), Regex::new("^bad").unwrap())
            .is_err());
    }

    #[test]
    fn match_object_accepts_extra_properties() {
        let mut t = Assertions::new();
        let actual = object! { "name" => "Alice", "location" => "Seattle" };
        assert!(t
            .assert_match_object(actual.clone(), object! { "name" => "Alice" })
            .is_ok());
        assert!(t
            .assert_match_object(actual, object! { "age" => 3 })
            .is_err());
    }
}
