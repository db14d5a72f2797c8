//! Scratch files: uniquely named paths in a shared directory, removed when the owning entry finishes.

use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::utils::config::PackagePaths;

/// Fresh path `<dir>/<pkg>-<uuid-v4><suffix>`. Nothing is created on disk.
/// Names are random so concurrent workers never collide in a shared `dir`.
pub fn scratch_path(dir: &Path, suffix: &str) -> PathBuf {
    dir.join(format!(
        "{}{}{}",
        PackagePaths::get().scratch_prefix(),
        Uuid::new_v4(),
        suffix
    ))
}

/// Create the scratch directory if needed.
pub fn prepare_scratch_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create scratch directory {}", dir.display()))
}

/// Temporary paths owned by one entry run. Every registered path is deleted on drop,
/// so cleanup happens on success, fallback and error returns alike.
#[derive(Debug, Default)]
pub struct ScratchFiles {
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete every registered path. Already-missing files are fine (a stage may fail before writing).
    pub fn cleanup(&mut self) {
        for path in self.paths.drain(..) {
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!("Could not remove temporary {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}
