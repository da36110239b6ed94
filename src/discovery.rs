//! # Suite file discovery
//!
//! Locates YAML suite files on disk and registers them as suites. A suite
//! file declares one suite and its cases; each case is a list of assertion
//! steps over literal values:
//!
//! ```yaml
//! suite: Examples for literal types
//! cases:
//!   - name: string literal narrows
//!     steps:
//!       - { assert: equal, actual: "UP", expected: "UP" }
//!       - { assert: is_undefined, actual: !undefined ~ }
//!   - name: not ready yet
//!     skip: true
//! ```
//!
//! YAML `null` is the host `null`. The `!undefined` tag is `undefined`,
//! `!symbol <description>` creates a fresh symbol, and any other tag on a
//! mapping (such as `!Point { x: 1 }`) creates an object with that class tag.

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

use crate::assertions::{Assertions, Check, MessagePattern};
use crate::errors::{HarnessError, Result};
use crate::registry::{BodyResult, CaseMode, Registry, SuiteHandle};
use crate::value::{Object, Symbol, Value};

// =====================
// File format
// =====================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    suite: String,
    #[serde(default)]
    cases: Vec<CaseSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseSpec {
    name: String,
    #[serde(default)]
    skip: bool,
    #[serde(default)]
    only: bool,
    #[serde(default)]
    steps: Vec<StepSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StepKind {
    Equal,
    StrictEqual,
    Same,
    MatchObject,
    Truthy,
    Falsy,
    #[serde(rename = "is_undefined")]
    Undefined,
    NotUndefined,
    #[serde(rename = "is_null")]
    Null,
    NotNull,
    Matches,
}

impl StepKind {
    fn takes_expected(self) -> bool {
        matches!(
            self,
            StepKind::Equal | StepKind::StrictEqual | StepKind::Same | StepKind::MatchObject
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepSpec {
    assert: StepKind,
    #[serde(default, deserialize_with = "present")]
    actual: Option<serde_yaml::Value>,
    #[serde(default, deserialize_with = "present")]
    expected: Option<serde_yaml::Value>,
    #[serde(default)]
    pattern: Option<String>,
}

// A present key always yields `Some`, even when its value is YAML `null`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_yaml::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}

// =====================
// Loaded steps
// =====================

#[derive(Debug, Clone)]
enum Step {
    Compare {
        kind: StepKind,
        actual: Value,
        expected: Value,
    },
    Predicate {
        kind: StepKind,
        actual: Value,
    },
    Matches {
        actual: Value,
        pattern: MessagePattern,
    },
}

impl Step {
    fn apply(&self, t: &mut Assertions) -> Check {
        match self {
            Step::Compare {
                kind,
                actual,
                expected,
            } => {
                let (actual, expected) = (actual.clone(), expected.clone());
                match kind {
                    StepKind::Equal => t.assert_equal(actual, expected),
                    StepKind::StrictEqual => t.assert_strict_equal(actual, expected),
                    StepKind::Same => t.assert_same(actual, expected),
                    _ => t.assert_match_object(actual, expected),
                }
            }
            Step::Predicate { kind, actual } => {
                let actual = actual.clone();
                match kind {
                    StepKind::Truthy => t.assert_truthy(actual),
                    StepKind::Falsy => t.assert_falsy(actual),
                    StepKind::Undefined => t.assert_undefined(actual),
                    StepKind::NotUndefined => t.assert_not_undefined(actual),
                    StepKind::Null => t.assert_null(actual),
                    _ => t.assert_not_null(actual),
                }
            }
            Step::Matches { actual, pattern } => t.assert_matches(actual.clone(), pattern.clone()),
        }
    }
}

/// A parsed suite file, ready to register.
#[derive(Debug)]
pub struct LoadedSuite {
    pub path: PathBuf,
    pub name: String,
    cases: Vec<LoadedCase>,
}

#[derive(Debug)]
struct LoadedCase {
    name: String,
    mode: CaseMode,
    steps: Arc<Vec<Step>>,
}

impl LoadedSuite {
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|case| case.name.as_str())
    }
}

// =====================
// Public API
// =====================

fn is_suite_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

/// Recursively finds suite files under `root`. A file path is returned as-is.
///
/// The returned list is sorted to keep registration order deterministic.
pub fn discover_suite_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| HarnessError::Walk {
            root: root.display().to_string(),
            source,
        })?;
        if entry.file_type().is_file() && is_suite_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    debug!(root = %root.display(), found = files.len(), "discovered suite files");
    Ok(files)
}

/// Reads and parses one suite file.
pub fn load_suite_file(path: &Path) -> Result<LoadedSuite> {
    let name = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: name.clone(),
        source,
    })?;
    parse_suite(&name, source, path.to_path_buf())
}

/// Parses suite YAML held in memory. `name` labels diagnostics.
pub fn parse_suite(name: &str, source: String, path: PathBuf) -> Result<LoadedSuite> {
    let file: SuiteFile = match serde_yaml::from_str(&source) {
        Ok(file) => file,
        Err(err) => {
            let span = err
                .location()
                .map(|location| SourceSpan::from((location.index(), 1)));
            return Err(HarnessError::MalformedSuite {
                message: err.to_string(),
                src: NamedSource::new(name, source),
                span,
                help: Some("a suite file needs a `suite` name and a list of `cases`".to_string()),
            });
        }
    };

    let malformed = |message: String, source: &str| HarnessError::MalformedSuite {
        message,
        src: NamedSource::new(name, source.to_string()),
        span: None,
        help: None,
    };

    let mut cases = Vec::with_capacity(file.cases.len());
    for case in file.cases {
        let mode = match (case.skip, case.only) {
            (true, true) => {
                return Err(malformed(
                    format!("case `{}` cannot be both `skip` and `only`", case.name),
                    &source,
                ))
            }
            (true, false) => CaseMode::Skip,
            (false, true) => CaseMode::Only,
            (false, false) => CaseMode::Run,
        };
        let steps = case
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| {
                load_step(step).map_err(|message| {
                    malformed(format!("case `{}`, step {}: {message}", case.name, i + 1), &source)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        cases.push(LoadedCase {
            name: case.name,
            mode,
            steps: Arc::new(steps),
        });
    }

    Ok(LoadedSuite {
        path,
        name: file.suite,
        cases,
    })
}

/// Registers a loaded suite. Each case replays its steps against a fresh
/// collector and stops at the first failing step.
pub fn register_suite(registry: &mut Registry, suite: LoadedSuite) -> Result<SuiteHandle> {
    let handle = registry.declare_suite(suite.name)?;
    for case in suite.cases {
        let steps = case.steps;
        registry.declare_case_with(handle, case.name, case.mode, move |t| -> BodyResult {
            for step in steps.iter() {
                step.apply(t)?;
            }
            Ok(())
        })?;
    }
    Ok(handle)
}

/// Discovers, loads, and registers every suite file under `root`. Returns
/// the number of suites registered.
pub fn register_path<P: AsRef<Path>>(registry: &mut Registry, root: P) -> Result<usize> {
    let files = discover_suite_files(root)?;
    for file in &files {
        let suite = load_suite_file(file)?;
        debug!(path = %file.display(), suite = %suite.name, "registering suite file");
        register_suite(registry, suite)?;
    }
    Ok(files.len())
}

// =====================
// Internal - value conversion
// =====================

fn load_step(step: StepSpec) -> std::result::Result<Step, String> {
    let actual = step
        .actual
        .ok_or_else(|| "missing `actual`".to_string())
        .and_then(|yaml| to_value(&yaml))?;

    if step.assert == StepKind::Matches {
        let pattern = step
            .pattern
            .ok_or_else(|| "`matches` requires a `pattern`".to_string())?;
        let re = regex::Regex::new(&pattern).map_err(|err| err.to_string())?;
        return Ok(Step::Matches {
            actual,
            pattern: MessagePattern::Regex(re),
        });
    }
    if step.pattern.is_some() {
        return Err("`pattern` is only valid for `matches`".to_string());
    }

    if step.assert.takes_expected() {
        let expected = step
            .expected
            .ok_or_else(|| "missing `expected`".to_string())
            .and_then(|yaml| to_value(&yaml))?;
        return Ok(Step::Compare {
            kind: step.assert,
            actual,
            expected,
        });
    }
    if step.expected.is_some() {
        return Err("this assertion takes no `expected`".to_string());
    }
    Ok(Step::Predicate {
        kind: step.assert,
        actual,
    })
}

/// Converts a YAML node into a host value.
fn to_value(yaml: &serde_yaml::Value) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| format!("number `{n}` is out of range")),
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(items) => items
            .iter()
            .map(to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::array),
        Yaml::Mapping(mapping) => to_object(mapping, Object::new()),
        Yaml::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let tag = tag.trim_start_matches('!');
            match (tag, &tagged.value) {
                ("undefined", _) => Ok(Value::Undefined),
                ("symbol", Yaml::String(description)) => {
                    Ok(Value::Symbol(Symbol::new(Some(description))))
                }
                ("symbol", Yaml::Null) => Ok(Value::Symbol(Symbol::new(None))),
                ("symbol", _) => Err("`!symbol` takes a string description".to_string()),
                (class, Yaml::Mapping(mapping)) => to_object(mapping, Object::instance(class)),
                (class, _) => Err(format!("tag `!{class}` must be applied to a mapping")),
            }
        }
    }
}

fn to_object(
    mapping: &serde_yaml::Mapping,
    mut object: Object,
) -> std::result::Result<Value, String> {
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(key) => key.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            other => return Err(format!("unsupported object key {other:?}")),
        };
        object.insert(key, to_value(value)?);
    }
    Ok(Value::from(object))
}
