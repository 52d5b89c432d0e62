//! Append-only diagnostics log.

use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::diagnostics::Diagnostic;

/// First line written to a freshly created log file.
pub const LOG_HEADER: &str = "# cadence loader diagnostics";

/// Destination for the per-load diagnostics block.
pub trait DiagnosticsLog {
    /// Appends one rendered block.
    ///
    /// # Errors
    ///
    /// - `io::Error` - If the destination cannot be opened or written
    fn append(&self, block: &str) -> io::Result<()>;

    /// Human-readable location, used in suppressed diagnostics.
    fn location(&self) -> String;
}

/// Log file opened in append mode for each write and closed right after.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticsLog for FileLog {
    fn append(&self, block: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }

        // Only the writer that creates the file writes the header.
        let (mut file, created) = match OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => (file, true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                (OpenOptions::new().append(true).open(&self.path)?, false)
            }
            Err(e) => return Err(e),
        };
        if created {
            writeln!(file, "{LOG_HEADER}")?;
            writeln!(file)?;
        }
        file.write_all(block.as_bytes())?;
        file.flush()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Discards every block.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl DiagnosticsLog for NullLog {
    fn append(&self, _block: &str) -> io::Result<()> {
        Ok(())
    }

    fn location(&self) -> String {
        "<disabled>".to_string()
    }
}

/// Renders the block appended for one load.
///
/// A `WARNINGS:` or `ERRORS:` heading is only written when its list is non-empty.
pub fn render_block<Tz>(
    timestamp: DateTime<Tz>,
    source: &str,
    warnings: &[Diagnostic],
    errors: &[Diagnostic],
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = vec![format!(
        "[{}] source: {source}",
        timestamp.format("%Y-%m-%d %H:%M:%S")
    )];
    if !warnings.is_empty() {
        lines.push("WARNINGS:".to_string());
        lines.extend(warnings.iter().map(|w| format!(" - {w}")));
    }
    if !errors.is_empty() {
        lines.push("ERRORS:".to_string());
        lines.extend(errors.iter().map(|e| format!(" - {e}")));
    }
    lines.push(String::new());
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_render_block_layout() {
        let block = render_block(
            fixed_time(),
            "library.md",
            &[Diagnostic::warning("first"), Diagnostic::warning("second")],
            &[],
        );
        assert_eq!(
            block,
            "[2024-03-09 14:05:00] source: library.md\nWARNINGS:\n - first\n - second\n\n"
        );
    }

    #[test]
    fn test_file_log_appends_after_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(temp_dir.path().join("logs").join("errors.log"));

        log.append("block one\n").unwrap();
        log.append("block two\n").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, format!("{LOG_HEADER}\n\nblock one\nblock two\n"));
    }

    #[test]
    fn test_concurrent_writers_share_one_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(temp_dir.path().join("errors.log"));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| log.append("block\n").unwrap());
            }
        });

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches(LOG_HEADER).count(), 1);
        assert_eq!(contents.matches("block\n").count(), 8);
    }

    #[test]
    fn test_file_log_on_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = FileLog::new(temp_dir.path());
        assert!(log.append("block\n").is_err());
    }
}
