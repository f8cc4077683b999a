use std::fmt;
use std::io::Write;

use console::Style;
use serde::Serialize;

use crate::screening::{EvaluationResult, FieldStatus};

pub const SEPARATOR: &str = "------------------";

/// CSV status of a symbol whose metrics could not be fetched
pub const ERROR_STATUS: &str = "error";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Color coded lines per field
    Text,
    /// One CSV row per field
    Csv,
}

/// Styled text report. With styling off, the same lines are produced
/// without escape codes.
pub struct Reporter {
    success: Style,
    warning: Style,
    neutral: Style,
    failure: Style,
}

impl Reporter {
    pub fn new(styled: bool) -> Self {
        Reporter {
            success: Style::new().green().force_styling(styled),
            warning: Style::new().yellow().force_styling(styled),
            neutral: Style::new().force_styling(styled),
            failure: Style::new().red().bold().force_styling(styled),
        }
    }

    pub fn render(&self, result: &EvaluationResult) -> String {
        let mut out = String::new();
        for field in &result.fields {
            let line = format!("{}: {}", field.field, field.display);
            let styled = match (field.status, field.rule.as_deref()) {
                (FieldStatus::Pass, _) => self.success.apply_to(line).to_string(),
                (FieldStatus::Fail, Some(rule)) => {
                    self.warning.apply_to(format!("{} ({})", line, rule)).to_string()
                }
                (FieldStatus::Fail, None) => self.warning.apply_to(line).to_string(),
                (FieldStatus::Unrated, _) | (FieldStatus::Skipped, _) => {
                    self.neutral.apply_to(line).to_string()
                }
            };
            out.push_str(&styled);
            out.push('\n');
        }
        out.push_str(SEPARATOR);
        out.push('\n');
        out
    }

    pub fn render_failure<E: fmt::Display>(&self, symbol: &str, cause: &E) -> String {
        let line = format!("{}: upstream error: {}", symbol, cause);
        format!("{}\n{}\n", self.failure.apply_to(line), SEPARATOR)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    symbol: &'a str,
    field: &'a str,
    value: &'a str,
    status: &'a str,
    rule: &'a str,
}

pub struct CsvReporter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(w: W) -> Self {
        CsvReporter { writer: csv::Writer::from_writer(w) }
    }

    pub fn write(&mut self, result: &EvaluationResult) -> Result<(), csv::Error> {
        for field in &result.fields {
            self.writer.serialize(CsvRow {
                symbol: &result.symbol,
                field: &field.field,
                value: &field.display,
                status: field.status.as_str(),
                rule: field.rule.as_deref().unwrap_or_default(),
            })?;
        }
        Ok(())
    }

    /// One `error` row for a symbol that produced no result. The cause goes
    /// in the value column.
    pub fn write_failure<E: fmt::Display>(&mut self, symbol: &str, cause: &E) -> Result<(), csv::Error> {
        self.writer.serialize(CsvRow {
            symbol,
            field: "",
            value: &cause.to_string(),
            status: ERROR_STATUS,
            rule: "",
        })
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.writer.into_inner().map_err(|err| csv::Error::from(err.into_error()))
    }
}
