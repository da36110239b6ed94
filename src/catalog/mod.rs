//! Built-in example suites.
//!
//! Every case is a small, self-contained example of a language feature
//! written the Rust way, pinned down with an assertion. Cases never share
//! mutable state: setup that several cases need is a factory function each
//! case calls for itself.
//!
//! The catalog is what `casebook run` executes when no `--no-builtin` flag is
//! given, and it doubles as an end-to-end exercise of the harness.

mod basic_types;
mod classes;
mod enums;
mod functions;
mod generics;
mod interfaces;
mod symbols;
mod unions;
mod utility_types;
mod variables;

use crate::errors::Result;
use crate::registry::Registry;

/// Registers every built-in suite, in a fixed order.
pub fn register_builtin(registry: &mut Registry) -> Result<()> {
    basic_types::register(registry)?;
    variables::register(registry)?;
    functions::register(registry)?;
    interfaces::register(registry)?;
    classes::register(registry)?;
    generics::register(registry)?;
    enums::register(registry)?;
    unions::register(registry)?;
    symbols::register(registry)?;
    utility_types::register(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CaseStatus, Runner};

    #[test]
    fn every_builtin_case_passes() {
        let mut registry = Registry::new();
        register_builtin(&mut registry).unwrap();
        let report = Runner::default().run(&registry);

        let failing: Vec<_> = report
            .suites()
            .iter()
            .flat_map(|suite| suite.cases.iter().map(move |case| (suite, case)))
            .filter(|(_, case)| case.status != CaseStatus::Passed)
            .map(|(suite, case)| format!("{} / {}: {:?}", suite.name, case.name, case.status))
            .collect();
        assert!(failing.is_empty(), "non-passing builtin cases: {failing:#?}");
        assert!(report.success());
    }

    #[test]
    fn builtin_registration_is_repeatable() {
        let mut first = Registry::new();
        let mut second = Registry::new();
        register_builtin(&mut first).unwrap();
        register_builtin(&mut second).unwrap();
        assert_eq!(first.case_count(), second.case_count());
        assert!(register_builtin(&mut first).is_err());
    }
}
