//! Two-phase document loader.
//!
//! Phase one splits the document into sections and validates each record
//! into users, media and playlist shells. Phase two resolves playlist owners
//! and members against everything phase one registered. Every call works on
//! its own [`Library`] and [`DiagnosticsSink`]; nothing survives between calls
//! except the block appended to the diagnostics log.

pub mod record;
pub mod resolver;
pub mod sections;
pub mod splitter;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use record::{RawRecord, RawValue};
pub use sections::ValidationPolicy;
pub use splitter::{RawSection, SectionKind, split_sections};

use crate::config::CadenceConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsLog, DiagnosticsSink, FileLog, NullLog};
use crate::domain::{Library, PlaylistShell};

/// Label used in diagnostics for documents passed as text.
const TEXT_SOURCE_LABEL: &str = "<text>";

/// Errors that abort a load. Content problems never do; they become diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Source document not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read source document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Document to load: inline text or a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Text(String),
    Path(PathBuf),
}

impl Source {
    pub fn text(text: impl Into<String>) -> Self {
        Source::Text(text.into())
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    /// Label written to the diagnostics log for this source.
    pub fn describe(&self) -> String {
        match self {
            Source::Text(_) => TEXT_SOURCE_LABEL.to_string(),
            Source::Path(path) => path.display().to_string(),
        }
    }

    fn read(self) -> Result<(String, String), LoadError> {
        let label = self.describe();
        match self {
            Source::Text(text) => Ok((text, label)),
            Source::Path(path) => {
                if !path.exists() {
                    return Err(LoadError::SourceNotFound { path });
                }
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| LoadError::Read { path, source })?;
                Ok((text, label))
            }
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

/// Everything one load produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    pub library: Library,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
    /// Problems writing the diagnostics log itself.
    pub suppressed: Vec<Diagnostic>,
}

impl LoadOutcome {
    /// True when the document produced neither warnings nor errors.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Configured entry point for loading documents.
///
/// A `Loader` holds no per-load state, so one instance can serve concurrent
/// loads from several threads.
pub struct Loader {
    policy: ValidationPolicy,
    log: Box<dyn DiagnosticsLog + Send + Sync>,
}

impl Loader {
    /// Creates a loader writing diagnostics to the configured log, if any.
    pub fn new(config: CadenceConfig) -> Self {
        let log: Box<dyn DiagnosticsLog + Send + Sync> = match config.diagnostics.log_path {
            Some(path) => Box::new(FileLog::new(path)),
            None => Box::new(NullLog),
        };
        Self {
            policy: ValidationPolicy::from_strict(config.loader.strict),
            log,
        }
    }

    /// Replaces the diagnostics log destination.
    pub fn with_log(mut self, log: impl DiagnosticsLog + Send + Sync + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Loads a document.
    ///
    /// # Errors
    ///
    /// - `LoadError::SourceNotFound` - If a path source does not exist
    /// - `LoadError::Read` - If a path source exists but cannot be read as UTF-8 text
    pub fn load(&self, source: impl Into<Source>) -> Result<LoadOutcome, LoadError> {
        let (text, label) = source.into().read()?;
        Ok(self.load_labeled(&text, &label))
    }

    /// Loads inline text. Never fails.
    pub fn load_text(&self, text: &str) -> LoadOutcome {
        self.load_labeled(text, TEXT_SOURCE_LABEL)
    }

    fn load_labeled(&self, text: &str, label: &str) -> LoadOutcome {
        tracing::debug!(source = label, policy = ?self.policy, "Loading document");
        let mut session = LoadSession::new(self.policy);
        for section in split_sections(text) {
            session.ingest(section);
        }
        session.finish(self.log.as_ref(), label)
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("policy", &self.policy)
            .field("log", &self.log.location())
            .finish()
    }
}

/// Loads a document with the default configuration and the given policy.
///
/// # Errors
///
/// - `LoadError::SourceNotFound` - If a path source does not exist
/// - `LoadError::Read` - If a path source cannot be read
pub fn load(source: impl Into<Source>, strict: bool) -> Result<LoadOutcome, LoadError> {
    Loader::new(CadenceConfig::default().with_strict(strict)).load(source)
}

/// State scoped to a single load call.
struct LoadSession {
    policy: ValidationPolicy,
    library: Library,
    sink: DiagnosticsSink,
    shells: Vec<PlaylistShell>,
    recognized: usize,
}

impl LoadSession {
    fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            library: Library::new(),
            sink: DiagnosticsSink::new(),
            shells: Vec::new(),
            recognized: 0,
        }
    }

    fn ingest(&mut self, section: RawSection) {
        let Some(kind) = section.kind else {
            if !section.records.is_empty() {
                self.sink
                    .warn(format!("unknown section '{}' ignored", section.header));
            }
            return;
        };

        self.recognized += 1;
        tracing::debug!(
            section = kind.label(),
            records = section.records.len(),
            "Loading section"
        );
        let records = &section.records;
        match kind {
            SectionKind::Users => sections::load_users(records, &mut self.library, &mut self.sink),
            SectionKind::Tracks => {
                sections::load_tracks(records, self.policy, &mut self.library, &mut self.sink)
            }
            SectionKind::Episodes => {
                sections::load_episodes(records, self.policy, &mut self.library, &mut self.sink)
            }
            SectionKind::Playlists => self
                .shells
                .extend(sections::load_playlists(records, &mut self.sink)),
        }
    }

    fn finish(mut self, log: &dyn DiagnosticsLog, source: &str) -> LoadOutcome {
        if self.recognized == 0 {
            self.sink
                .warn(format!("no recognized sections found in {source}"));
        }

        resolver::resolve_links(self.shells, &mut self.library, &mut self.sink);
        let diagnostics = self.sink.finish(log, source);

        tracing::info!(
            source,
            users = self.library.users().len(),
            media = self.library.media().len(),
            playlists = self.library.playlists().len(),
            warnings = diagnostics.warnings.len(),
            errors = diagnostics.errors.len(),
            "Loaded document"
        );

        LoadOutcome {
            library: self.library,
            warnings: diagnostics.warnings,
            errors: diagnostics.errors,
            suppressed: diagnostics.suppressed,
        }
    }
}
