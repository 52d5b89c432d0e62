//! Centralized configuration for Cadence.
//!
//! Loader policy and diagnostics log settings live here, with environment
//! variable overrides for runtime customization.

use std::path::PathBuf;

/// Default location of the append-only diagnostics log.
pub const DEFAULT_LOG_PATH: &str = "logs/errors.log";

/// Central configuration for all Cadence components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CadenceConfig {
    pub loader: LoaderConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Validation policy applied while loading documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Drop records with invalid values (errors) instead of warning and defaulting
    pub strict: bool,
}

/// Diagnostics log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Append-only log file; `None` disables the log
    pub log_path: Option<PathBuf>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_path: Some(PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }
}

/// Errors that occur while validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Diagnostics log path {} is a directory", path.display())]
    LogPathIsDirectory { path: PathBuf },
}

impl CadenceConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// - `CADENCE_STRICT` - `true`/`1` or `false`/`0`
    /// - `CADENCE_DIAGNOSTICS_LOG` - log file path, empty to disable the log
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup` on top of the defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(strict) = lookup("CADENCE_STRICT").and_then(|v| parse_flag(&v)) {
            config.loader.strict = strict;
        }

        if let Some(path) = lookup("CADENCE_DIAGNOSTICS_LOG") {
            let path = path.trim();
            config.diagnostics.log_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        config
    }

    /// Creates a strict configuration with the diagnostics log disabled.
    pub fn for_testing() -> Self {
        Self {
            loader: LoaderConfig { strict: true },
            diagnostics: DiagnosticsConfig { log_path: None },
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.loader.strict = strict;
        self
    }

    pub fn with_log_path(mut self, log_path: Option<PathBuf>) -> Self {
        self.diagnostics.log_path = log_path;
        self
    }

    /// Checks settings that would make every log write fail.
    ///
    /// # Errors
    ///
    /// - `ConfigError::LogPathIsDirectory` - If the log path names an existing directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.diagnostics.log_path
            && path.is_dir()
        {
            return Err(ConfigError::LogPathIsDirectory { path: path.clone() });
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
