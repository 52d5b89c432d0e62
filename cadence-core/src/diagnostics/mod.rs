//! Warnings and errors collected while loading one document.
//!
//! A [`DiagnosticsSink`] lives for exactly one load. When the load finishes the
//! sink appends a timestamped block to a [`DiagnosticsLog`] (only if something
//! was reported) and hands the collected sequences back to the caller.

pub mod log;

use std::fmt;

use serde::Serialize;

pub use log::{DiagnosticsLog, FileLog, NullLog, render_block};

use crate::loader::record::RawRecord;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Warning => write!(f, "warning"),
            DiagnosticKind::Error => write!(f, "error"),
        }
    }
}

/// One reported problem, optionally carrying the record that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RawRecord>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            message: message.into(),
            record: None,
        }
    }

    pub fn error(message: impl Into<String>, record: Option<RawRecord>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            record,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            Some(record) => write!(f, "{} | record: {record}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Diagnostics collected by one load, split by destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
    /// Problems with the diagnostics log itself; never written to the log.
    pub suppressed: Vec<Diagnostic>,
}

/// Per-load accumulator for warnings and errors.
#[derive(Debug, Default)]
pub struct DiagnosticsSink {
    collected: Diagnostics,
}

impl DiagnosticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(message);
        tracing::warn!(diagnostic = %diagnostic.message, "Loader warning");
        self.collected.warnings.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, record: &RawRecord) {
        let diagnostic = Diagnostic::error(message, Some(record.clone()));
        tracing::error!(diagnostic = %diagnostic.message, %record, "Loader error");
        self.collected.errors.push(diagnostic);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.collected.warnings
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.collected.errors
    }

    /// Appends one block for this load to `log`, then returns everything collected.
    ///
    /// Nothing is written when no warning or error was reported. A failed write
    /// is recorded as a suppressed diagnostic and never returned as an error.
    pub fn finish(mut self, log: &dyn DiagnosticsLog, source: &str) -> Diagnostics {
        if self.collected.warnings.is_empty() && self.collected.errors.is_empty() {
            return self.collected;
        }

        let block = render_block(
            chrono::Local::now(),
            source,
            &self.collected.warnings,
            &self.collected.errors,
        );
        if let Err(e) = log.append(&block) {
            tracing::warn!(log = %log.location(), error = %e, "Failed to write diagnostics log");
            self.collected.suppressed.push(Diagnostic::warning(format!(
                "could not write diagnostics log {}: {e}",
                log.location()
            )));
        }
        self.collected
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;

    use super::*;

    #[derive(Default)]
    struct RecordingLog {
        blocks: RefCell<Vec<String>>,
    }

    impl DiagnosticsLog for RecordingLog {
        fn append(&self, block: &str) -> io::Result<()> {
            self.blocks.borrow_mut().push(block.to_string());
            Ok(())
        }

        fn location(&self) -> String {
            "<memory>".to_string()
        }
    }

    struct BrokenLog;

    impl DiagnosticsLog for BrokenLog {
        fn append(&self, _block: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn location(&self) -> String {
            "/readonly/errors.log".to_string()
        }
    }

    #[test]
    fn test_clean_load_writes_nothing() {
        let log = RecordingLog::default();
        let collected = DiagnosticsSink::new().finish(&log, "<text>");
        assert!(log.blocks.borrow().is_empty());
        assert_eq!(collected, Diagnostics::default());
    }

    #[test]
    fn test_block_lists_warnings_and_errors() {
        let log = RecordingLog::default();
        let mut sink = DiagnosticsSink::new();
        sink.warn("duplicate user 'Ana'");
        sink.error("user without name", &RawRecord::default());
        let collected = sink.finish(&log, "catalog.md");

        let blocks = log.blocks.borrow();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("source: catalog.md"));
        assert!(blocks[0].contains("WARNINGS:\n - duplicate user 'Ana'"));
        assert!(blocks[0].contains("ERRORS:\n - user without name | record: {}"));
        assert_eq!(collected.warnings.len(), 1);
        assert_eq!(collected.errors.len(), 1);
        assert!(collected.suppressed.is_empty());
    }

    #[test]
    fn test_write_failure_is_suppressed() {
        let mut sink = DiagnosticsSink::new();
        sink.warn("something odd");
        let collected = sink.finish(&BrokenLog, "<text>");

        assert_eq!(collected.warnings.len(), 1);
        assert_eq!(collected.suppressed.len(), 1);
        assert!(collected.suppressed[0].message.contains("/readonly/errors.log"));
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_events_carry_diagnostic_field() {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut sink = DiagnosticsSink::new();
            sink.warn("duplicate user 'Ana'");
            sink.error("user without name", &RawRecord::default());
        });

        let logged = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Loader warning diagnostic=duplicate user 'Ana'"));
        assert!(logged.contains("Loader error diagnostic=user without name"));
    }

    #[test]
    fn test_display_appends_record() {
        let diagnostic = Diagnostic::error("missing title", Some(RawRecord::default()));
        assert_eq!(diagnostic.to_string(), "missing title | record: {}");
        assert_eq!(Diagnostic::warning("plain").to_string(), "plain");
    }
}
