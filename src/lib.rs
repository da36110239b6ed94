//! # casebook
//!
//! An example runner and assertion harness. Examples are grouped into named
//! suites of cases; every case runs in isolation against its own assertion
//! collector, and every outcome is recorded before the run moves on.
//!
//! ```
//! use casebook::{Registry, Runner, object};
//!
//! let mut registry = Registry::new();
//! registry
//!     .suite("objects", |s| {
//!         s.case("spread keeps the rightmost value", |t| {
//!             let base = casebook::value::Object::new().with("a", 1).with("b", 2);
//!             let merged = base.spread(&casebook::value::Object::new().with("b", 3));
//!             t.assert_strict_equal(merged, object! { "a" => 1, "b" => 3 })?;
//!             Ok(())
//!         })?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let report = Runner::default().run(&registry);
//! assert!(report.success());
//! ```

pub mod assertions;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod report;
pub mod runner;
pub mod value;

pub use crate::assertions::{AssertionOutcome, Assertions, Check, MessagePattern, OutcomeKind};
pub use crate::config::{ColorMode, HarnessConfig};
pub use crate::errors::{AssertionFailure, CaseError, HarnessError, Result};
pub use crate::registry::{BodyResult, CaseMode, Registry, SuiteHandle, SuiteScope};
pub use crate::report::{ReportFormat, Reporter};
pub use crate::runner::{
    CaseFault, CaseResult, CaseStatus, Counts, ErrorKind, RunConfig, RunReport, Runner,
    SuiteReport,
};
pub use crate::value::{Object, Symbol, TypeTag, Value};
