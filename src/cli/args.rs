//! Defines the command-line arguments and subcommands for the casebook CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ColorMode, HarnessConfig};
use crate::report::ReportFormat;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "casebook",
    version,
    about = "Runs example suites in isolation and reports which assertions held."
)]
pub struct CasebookArgs {
    /// Increase log detail (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the built-in catalog and every suite file found under PATHS.
    Run(RunArgs),
    /// List registered suites and cases without running them.
    List(SourceArgs),
}

/// Where suites come from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Directories or files to search for `*.yaml` / `*.yml` suites.
    pub paths: Vec<PathBuf>,

    /// Leave out the built-in example catalog.
    #[arg(long)]
    pub no_builtin: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only run cases whose suite or case name contains TEXT (case-insensitive).
    #[arg(long, env = "CASEBOOK_FILTER", value_name = "TEXT")]
    pub filter: Option<String>,

    /// Abandon any case that runs longer than this many milliseconds.
    #[arg(long, env = "CASEBOOK_TIMEOUT_MS", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Pretty)]
    pub format: ReportFormat,

    /// When to color pretty output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

impl RunArgs {
    pub fn to_config(&self) -> HarnessConfig {
        HarnessConfig {
            paths: self.source.paths.clone(),
            builtin: !self.source.no_builtin,
            filter: self.filter.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
            format: self.format,
            ..HarnessConfig::default()
        }
        .with_color_mode(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_arguments_build_a_config() {
        let args = CasebookArgs::try_parse_from([
            "casebook",
            "run",
            "suites",
            "--no-builtin",
            "--filter",
            "enum",
            "--timeout-ms",
            "50",
            "--format",
            "json",
            "--color",
            "never",
        ])
        .unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected the run subcommand");
        };
        let config = run.to_config();
        assert_eq!(config.paths, vec![PathBuf::from("suites")]);
        assert!(!config.builtin);
        assert_eq!(config.filter.as_deref(), Some("enum"));
        assert_eq!(config.timeout, Some(Duration::from_millis(50)));
        assert_eq!(config.format, ReportFormat::Json);
        assert!(!config.use_colors);
    }

    #[test]
    fn verbosity_flags_are_global() {
        let args = CasebookArgs::try_parse_from(["casebook", "list", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Command::List(_)));
    }
}
