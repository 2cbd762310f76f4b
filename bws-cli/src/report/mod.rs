//! Verbosity-gated rendering of call outcomes.
//!
//! The [`Reporter`] owns both output sinks for the duration of a render: the
//! result goes to `out`, job errors and failures to `err`. Styling is applied
//! per span, so a render interrupted half way never leaves the terminal
//! coloured.

use std::io::{self, StderrLock, StdoutLock, Write};

use console::style;
use serde::Serialize;

use crate::domain::Verbosity;
use crate::error::{BwsError, ErrorKind, Result};
use crate::ports::{CallOutcome, ProbeResult, ResponseMetadata};
use crate::proto::{JobError, JobStatus};

mod render;

pub use render::Render;

pub struct Reporter<W: Write, E: Write> {
    verbosity: Verbosity,
    out: W,
    err: E,
    styled: bool,
}

impl Reporter<StdoutLock<'static>, StderrLock<'static>> {
    /// Locks the process' stdout and stderr for the reporter's lifetime.
    pub fn stdio(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            out: io::stdout().lock(),
            err: io::stderr().lock(),
            styled: console::colors_enabled_stderr(),
        }
    }
}

impl<W: Write, E: Write> Reporter<W, E> {
    pub const fn new(verbosity: Verbosity, out: W, err: E) -> Self {
        Self {
            verbosity,
            out,
            err,
            styled: false,
        }
    }

    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn into_sinks(self) -> (W, E) {
        (self.out, self.err)
    }

    pub fn render<R: Render>(&mut self, outcome: &CallOutcome<R>) -> Result<()> {
        let response = &outcome.response;
        let status = response.job_status();
        let errors = response.job_errors();

        if self.verbosity.shows(Verbosity::Minimal) {
            match status {
                Some(raw) if raw != JobStatus::Succeeded as i32 => writeln!(
                    self.out,
                    "Job {}: {} error(s)",
                    JobStatus::describe(raw),
                    errors.len()
                )?,
                _ => writeln!(self.out, "{}", response.summary())?,
            }
        }

        if self.verbosity.shows(Verbosity::Normal) {
            writeln!(self.out, "Response status: {}", outcome.metadata.status_line)?;
            if let Some(raw) = status {
                writeln!(self.out, "Job status: {}", JobStatus::describe(raw))?;
            }
            self.job_errors(errors)?;
        }

        if self.verbosity.shows(Verbosity::Detailed) {
            self.metadata(&outcome.metadata, "")?;
        }

        if self.verbosity.shows(Verbosity::Diagnostic) {
            self.dump(response)?;
        }

        self.flush()
    }

    pub fn render_health(&mut self, results: &[ProbeResult]) -> Result<()> {
        if self.verbosity.shows(Verbosity::Minimal) {
            for result in results {
                writeln!(self.out, "{}: {}", result.probe.label(), result.status)?;
            }
        }

        if self.verbosity.shows(Verbosity::Normal) {
            for result in results {
                writeln!(
                    self.out,
                    "{} response status: {}",
                    result.probe.label(),
                    result.metadata.status_line
                )?;
                writeln!(self.out, "{} metadata:", result.probe.label())?;
                self.metadata(&result.metadata, "  ")?;
            }
        }

        if self.verbosity.shows(Verbosity::Diagnostic) {
            self.dump(results)?;
        }

        self.flush()
    }

    /// Reports a failed invocation. Unexpected failures are printed even when
    /// quiet.
    pub fn render_error(&mut self, error: &BwsError) -> Result<()> {
        let unexpected = error.kind() == ErrorKind::Unexpected;
        if !unexpected && !self.verbosity.shows(Verbosity::Minimal) {
            return Ok(());
        }

        let label = style("error:").red().bold().force_styling(self.styled);
        writeln!(self.err, "{label} {error}")?;

        if self.verbosity.shows(Verbosity::Diagnostic) {
            writeln!(
                self.err,
                "  classification: {:?}, exit code {}",
                error.kind(),
                error.exit_code()
            )?;
        }
        self.flush()
    }

    fn job_errors(&mut self, errors: &[JobError]) -> Result<()> {
        if errors.is_empty() {
            writeln!(self.out, "No errors reported.")?;
            return Ok(());
        }

        for error in errors {
            let code = style(format!("[{}]", error.error_code))
                .red()
                .force_styling(self.styled);
            writeln!(self.err, "Job error {code} {}", error.message)?;
        }
        Ok(())
    }

    fn metadata(&mut self, metadata: &ResponseMetadata, indent: &str) -> Result<()> {
        if metadata.entries.is_empty() {
            writeln!(self.out, "{indent}Metadata: (none)")?;
            return Ok(());
        }

        writeln!(self.out, "{indent}Metadata:")?;
        for (key, values) in &metadata.entries {
            writeln!(self.out, "{indent}  {key}: {}", values.join(", "))?;
        }
        Ok(())
    }

    fn dump<T: Serialize + ?Sized>(&mut self, payload: &T) -> Result<()> {
        writeln!(self.out, "Payload:")?;
        writeln!(self.out, "{}", serde_json::to_string_pretty(payload)?)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }
}
