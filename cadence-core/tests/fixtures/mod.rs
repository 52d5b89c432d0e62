//! Shared fixtures for loader integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cadence_core::{CadenceConfig, Loader};
use tempfile::TempDir;

/// Catalog touching every section type with no problems in it.
pub const CLEAN_CATALOG: &str = "\
# Usuários
- nome: Ana
- nome: Bruno

---

# Músicas
- titulo: Yesterday
    artista: The Beatles
    genero: Rock
    duracao: 125
- titulo: Garota de Ipanema
    artista: Tom Jobim
    genero: Bossa Nova
    duracao: 320

# Podcasts
- titulo: Pilot
    temporada: T1
    episodio: 1
    host: Carla
    duracao: 1800

# Playlists
- nome: Road Trip
    usuario: Ana
    itens: [Yesterday, Pilot, Garota de Ipanema]
";

/// Temporary directory holding documents and a diagnostics log.
pub struct LoaderFixture {
    temp_dir: TempDir,
}

impl LoaderFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("logs").join("errors.log")
    }

    /// Loader appending to this fixture's log.
    pub fn loader(&self, strict: bool) -> Loader {
        Loader::new(
            CadenceConfig::default()
                .with_strict(strict)
                .with_log_path(Some(self.log_path())),
        )
    }

    pub fn write_document(&self, name: &str, text: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    pub fn read_log(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Loader with the diagnostics log disabled.
pub fn quiet_loader(strict: bool) -> Loader {
    Loader::new(CadenceConfig::for_testing().with_strict(strict))
}

pub fn messages(diagnostics: &[cadence_core::Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}
