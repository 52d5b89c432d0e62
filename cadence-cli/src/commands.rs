//! CLI command implementations

use std::path::PathBuf;
use std::process::ExitCode;

use cadence_core::{CadenceConfig, Diagnostic, LoadOutcome, Loader, Result};
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load a catalog document and print what it contains
    Load {
        /// Path to the catalog document
        path: PathBuf,
        /// Drop records with invalid values instead of defaulting them
        #[arg(long)]
        strict: bool,
        /// Print the whole outcome as JSON
        #[arg(long)]
        json: bool,
        /// Do not append to the diagnostics log
        #[arg(long, conflicts_with = "log_file")]
        no_log: bool,
        /// Diagnostics log to append to
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Validate a catalog document; fails when any record is rejected
    Check {
        /// Path to the catalog document
        path: PathBuf,
        /// Drop records with invalid values instead of defaulting them
        #[arg(long)]
        strict: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// - `CadenceError::Config` - The diagnostics log settings are unusable
/// - `CadenceError::Load` - The document is missing or unreadable
/// - `CadenceError::Io` - Output could not be rendered
pub fn handle_command(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Load {
            path,
            strict,
            json,
            no_log,
            log_file,
        } => {
            let mut config = CadenceConfig::from_env();
            if strict {
                config.loader.strict = true;
            }
            if no_log {
                config.diagnostics.log_path = None;
            } else if log_file.is_some() {
                config.diagnostics.log_path = log_file;
            }
            load_document(config, path, json)
        }
        Commands::Check { path, strict } => check_document(path, strict),
    }
}

/// Load a document and print a summary or JSON
///
/// # Errors
/// - `CadenceError::Config` - The configured log path is a directory
/// - `CadenceError::Load` - The document could not be read
pub fn load_document(config: CadenceConfig, path: PathBuf, json: bool) -> Result<ExitCode> {
    config.validate()?;
    let outcome = Loader::new(config).load(path.as_path())?;

    if json {
        let rendered = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        println!("Loaded {}", path.display());
        print_counts(&outcome);
        print_diagnostics("Warnings", &outcome.warnings);
        print_diagnostics("Errors", &outcome.errors);
    }

    for note in &outcome.suppressed {
        eprintln!("Note: {note}");
    }

    Ok(ExitCode::SUCCESS)
}

/// Load a document without logging and fail if any error was reported
///
/// # Errors
/// - `CadenceError::Load` - The document could not be read
pub fn check_document(path: PathBuf, strict: bool) -> Result<ExitCode> {
    let config = CadenceConfig::default()
        .with_strict(strict)
        .with_log_path(None);
    let outcome = Loader::new(config).load(path.as_path())?;

    print_diagnostics("Warnings", &outcome.warnings);
    print_diagnostics("Errors", &outcome.errors);

    if outcome.errors.is_empty() {
        println!(
            "{}: ok ({} warnings)",
            path.display(),
            outcome.warnings.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{}: {} errors, {} warnings",
            path.display(),
            outcome.errors.len(),
            outcome.warnings.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn print_counts(outcome: &LoadOutcome) {
    let library = &outcome.library;
    println!("  Users:     {}", library.users().len());
    println!("  Tracks:    {}", library.tracks().count());
    println!("  Episodes:  {}", library.episodes().count());
    println!("  Playlists: {}", library.playlists().len());
}

fn print_diagnostics(heading: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("{heading} ({}):", diagnostics.len());
    for diagnostic in diagnostics {
        println!("  - {diagnostic}");
    }
}
