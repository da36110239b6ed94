//! Harness configuration shared by the CLI and library callers.

use std::path::PathBuf;
use std::time::Duration;
use termcolor::ColorChoice;

use crate::report::ReportFormat;
use crate::runner::RunConfig;

/// When to color pretty output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Everything a `casebook run` needs to know.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directories or files to search for YAML suites.
    pub paths: Vec<PathBuf>,
    /// Whether the built-in catalog is registered before discovered suites.
    pub builtin: bool,
    pub filter: Option<String>,
    pub timeout: Option<Duration>,
    pub format: ReportFormat,
    pub use_colors: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            builtin: true,
            filter: None,
            timeout: None,
            format: ReportFormat::Pretty,
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl HarnessConfig {
    /// Resolves a [`ColorMode`] against the terminal.
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.use_colors = match mode {
            ColorMode::Auto => atty::is(atty::Stream::Stdout),
            ColorMode::Always => true,
            ColorMode::Never => false,
        };
        self
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            timeout: self.timeout,
            filter: self.filter.clone(),
        }
    }

    /// Color choice for a `termcolor` stream. JSON output is never colored.
    pub fn color_choice(&self) -> ColorChoice {
        if self.use_colors && self.format == ReportFormat::Pretty {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        }
    }
}
