//! The casebook command-line interface.
//!
//! This module is the entry point for all CLI commands. It wires argument
//! parsing, logging, registration, the runner, and the reporter together and
//! maps the outcome to a process exit code.

use clap::Parser;
use std::io::Write;
use std::panic;
use termcolor::{ColorChoice, StandardStream};
use tracing::{debug, info};

use crate::catalog;
use crate::cli::args::{CasebookArgs, Command, RunArgs, SourceArgs};
use crate::config::HarnessConfig;
use crate::discovery;
use crate::errors::{HarnessError, Result};
use crate::logging::{self, Verbosity};
use crate::registry::{CaseMode, Registry};
use crate::report::Reporter;
use crate::runner::{self, Runner};

pub mod args;

/// No case Failed or Errored. Skipped cases do not count against a run.
pub const EXIT_SUCCESS: i32 = 0;
/// At least one case Failed or Errored.
pub const EXIT_FAILURE: i32 = 1;
/// Registration or discovery aborted the run before any case executed.
pub const EXIT_ABORTED: i32 = 2;

/// Parses arguments, executes the command, and returns the exit code.
pub fn run() -> i32 {
    let args = CasebookArgs::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    route_panics_to_logs();

    match execute(&args.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            EXIT_ABORTED
        }
    }
}

/// Runs one subcommand. Registration and discovery errors are returned; case
/// failures are part of the report and only affect the exit code.
pub fn execute(command: &Command) -> Result<i32> {
    match command {
        Command::Run(run) => handle_run(run),
        Command::List(source) => handle_list(source),
    }
}

/// Wraps the panic hook. Panics raised inside case bodies are already
/// recorded by the runner and are only logged at debug level; any other
/// panic goes to the previous hook.
fn route_panics_to_logs() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if runner::inside_case() {
            debug!("panic caught by the runner: {info}");
        } else {
            previous(info);
        }
    }));
}

/// Registers the built-in catalog (if enabled) followed by every suite file
/// under `paths`, in argument order.
pub fn build_registry(config: &HarnessConfig) -> Result<Registry> {
    let mut registry = Registry::new();
    if config.builtin {
        catalog::register_builtin(&mut registry)?;
    }
    for path in &config.paths {
        let found = discovery::register_path(&mut registry, path)?;
        info!(path = %path.display(), suites = found, "registered suite files");
    }
    Ok(registry)
}

fn handle_run(args: &RunArgs) -> Result<i32> {
    let config = args.to_config();
    let registry = build_registry(&config)?;
    let report = Runner::new(config.run_config()).run(&registry);

    let mut stdout = StandardStream::stdout(config.color_choice());
    Reporter::new(config.format).write(&report, &mut stdout)?;

    Ok(if report.success() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

fn handle_list(args: &SourceArgs) -> Result<i32> {
    let config = HarnessConfig {
        paths: args.paths.clone(),
        builtin: !args.no_builtin,
        ..HarnessConfig::default()
    };
    let registry = build_registry(&config)?;
    let mut stdout = StandardStream::stdout(ColorChoice::Never);
    write_listing(&registry, &mut stdout).map_err(|source| HarnessError::Report { source })?;
    Ok(EXIT_SUCCESS)
}

/// Writes one line per suite and one indented line per case, tagging
/// skipped and focused cases.
pub fn write_listing<W: Write>(registry: &Registry, out: &mut W) -> std::io::Result<()> {
    for suite in registry.suites() {
        writeln!(out, "{}", suite.name())?;
        for case in suite.cases() {
            match case.mode() {
                CaseMode::Run => writeln!(out, "  {}", case.name())?,
                CaseMode::Skip => writeln!(out, "  {} [skip]", case.name())?,
                CaseMode::Only => writeln!(out, "  {} [only]", case.name())?,
            }
        }
    }
    writeln!(
        out,
        "{} suites, {} cases",
        registry.suites().len(),
        registry.case_count()
    )
}
