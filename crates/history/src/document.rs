use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use model::RunSummary;
use tempfile::NamedTempFile;

use crate::PersistenceError;

/// The JSON file holding the history, newest run first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDocument {
    path: PathBuf,
}

impl HistoryDocument {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` if there is no document yet.
    pub fn load(&self) -> Result<Option<Vec<RunSummary>>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(why) if why.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(why) => return Err(why.into()),
        };
        let runs = serde_json::from_slice(&bytes).map_err(PersistenceError::Decode)?;
        Ok(Some(runs))
    }

    /// Replaces the document with `runs`.
    ///
    /// The new content goes to a temporary file next to the document, is synced
    /// and then renamed over it, so readers see either the old or the new list.
    pub fn save(&self, runs: &[RunSummary]) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec(runs).map_err(PersistenceError::Encode)?;

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|why| why.error)?;

        log::info!("saved {} runs to {}", runs.len(), self.path.display());
        Ok(())
    }
}
