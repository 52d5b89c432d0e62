//! Cadence Core - plain-text catalog loading for a music and podcast library
//!
//! This crate turns a lightly structured text document into users, tracks,
//! podcast episodes and playlists with their cross references resolved. It
//! also provides the diagnostics log, configuration and tracing setup shared
//! with the command-line front end.

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod loader;
pub mod registry;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{CadenceConfig, ConfigError};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsLog, FileLog, NullLog};
pub use domain::{
    DomainError, Episode, Library, Media, MediaId, MediaInfo, NaturalKey, Playlist, PlaylistId,
    Track, User, UserId,
};
pub use loader::{LoadError, LoadOutcome, Loader, Source, ValidationPolicy, load};

/// Errors that can bubble up from any Cadence subsystem.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CadenceError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CadenceError::Load(e) => match e {
                LoadError::SourceNotFound { path } => {
                    format!("File not found: {}", path.display())
                }
                LoadError::Read { path, .. } => {
                    format!("Could not read {} as text", path.display())
                }
            },
            CadenceError::Domain(e) => e.user_message(),
            CadenceError::Config(e) => e.to_string(),
            CadenceError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CadenceError::Load(LoadError::SourceNotFound { .. })
                | CadenceError::Config(_)
                | CadenceError::Domain(DomainError::RatingOutOfRange { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, CadenceError>;
