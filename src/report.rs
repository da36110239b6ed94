//! Renders a [`RunReport`] for humans or machines.
//!
//! Pretty output is line-oriented: one line per suite, one indented line per
//! case, failure detail under failing cases, and a final summary. Colors go
//! through `termcolor`, so any [`WriteColor`] sink works, including an
//! uncolored in-memory buffer.

use difference::{Changeset, Difference};
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::errors::{HarnessError, Result};
use crate::runner::{CaseResult, CaseStatus, RunReport};

const DETAIL_INDENT: &str = "        ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Pretty,
    Json,
}

/// Writes reports in the configured format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn write<W: WriteColor>(&self, report: &RunReport, out: &mut W) -> Result<()> {
        match self.format {
            ReportFormat::Pretty => {
                write_pretty(report, out).map_err(|source| HarnessError::Report { source })
            }
            ReportFormat::Json => write_json(report, out),
        }
    }
}

/// Serializes the whole report as pretty-printed JSON.
pub fn write_json<W: Write>(report: &RunReport, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)
        .map_err(|source| HarnessError::Json { source })?;
    writeln!(out).map_err(|source| HarnessError::Report { source })
}

pub fn write_pretty<W: WriteColor>(report: &RunReport, out: &mut W) -> io::Result<()> {
    for suite in report.suites() {
        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(out, "{}", suite.name)?;
        out.reset()?;
        for case in &suite.cases {
            write_case(case, out)?;
        }
    }
    write_summary(report, out)
}

fn status_color(status: CaseStatus) -> Color {
    match status {
        CaseStatus::Passed => Color::Green,
        CaseStatus::Failed => Color::Red,
        CaseStatus::Errored => Color::Magenta,
        CaseStatus::Skipped => Color::Yellow,
    }
}

fn write_case<W: WriteColor>(case: &CaseResult, out: &mut W) -> io::Result<()> {
    write!(out, "  ")?;
    out.set_color(ColorSpec::new().set_fg(Some(status_color(case.status))).set_bold(true))?;
    write!(out, "{:<5}", case.status.as_str())?;
    out.reset()?;
    writeln!(out, " {}", case.name)?;

    match case.status {
        CaseStatus::Passed => Ok(()),
        CaseStatus::Skipped => {
            if let Some(reason) = &case.skip_reason {
                writeln!(out, "{DETAIL_INDENT}({reason})")?;
            }
            Ok(())
        }
        CaseStatus::Errored => {
            if let Some(error) = &case.error {
                writeln!(out, "{DETAIL_INDENT}{}", error.message)?;
            }
            Ok(())
        }
        CaseStatus::Failed => write_failure(case, out),
    }
}

fn write_failure<W: WriteColor>(case: &CaseResult, out: &mut W) -> io::Result<()> {
    let Some(outcome) = case.failure() else {
        return Ok(());
    };
    match outcome.message() {
        Some(message) => writeln!(out, "{DETAIL_INDENT}{}: {message}", outcome.subject())?,
        None => writeln!(out, "{DETAIL_INDENT}{} failed", outcome.subject())?,
    }

    match (outcome.expected(), outcome.actual()) {
        (Some(expected), Some(actual)) if expected.contains('\n') || actual.contains('\n') => {
            writeln!(out, "{DETAIL_INDENT}diff (- expected, + actual):")?;
            let changeset = Changeset::new(expected, actual, "\n");
            write_diff(out, &changeset.diffs)
        }
        (expected, actual) => {
            if let Some(expected) = expected {
                writeln!(out, "{DETAIL_INDENT}expected: {expected}")?;
            }
            if let Some(actual) = actual {
                writeln!(out, "{DETAIL_INDENT}actual:   {actual}")?;
            }
            Ok(())
        }
    }
}

fn write_diff<W: WriteColor>(out: &mut W, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        let (marker, color, text) = match diff {
            Difference::Same(text) => (' ', None, text),
            Difference::Rem(text) => ('-', Some(Color::Green), text),
            Difference::Add(text) => ('+', Some(Color::Red), text),
        };
        for line in text.split('\n') {
            out.set_color(ColorSpec::new().set_fg(color))?;
            write!(out, "{DETAIL_INDENT}{marker} {line}")?;
            out.reset()?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_summary<W: WriteColor>(report: &RunReport, out: &mut W) -> io::Result<()> {
    let counts = report.counts();
    writeln!(out)?;
    let color = if report.success() {
        Color::Green
    } else {
        Color::Red
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "Summary:")?;
    out.reset()?;
    writeln!(
        out,
        " {} passed, {} failed, {} errored, {} skipped, {} total",
        counts.passed,
        counts.failed,
        counts.errored,
        counts.skipped,
        counts.total()
    )
}
