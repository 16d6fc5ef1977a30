use model::RunSummary;
use utility::id::Id;

use crate::{
    AddOutcome, HistoryConfig, HistoryDocument, RemoveOutcome, RunHistory, SaveStatus,
};

/// Owns the history together with its document.
///
/// Every mutation writes the whole list. The in-memory list is authoritative:
/// a failed write is reported, marks the store dirty and is retried by the next
/// mutation or [`flush`](Self::flush).
#[derive(Debug)]
pub struct RunHistoryStore {
    history: RunHistory,
    document: HistoryDocument,
    dirty: bool,
}

impl RunHistoryStore {
    /// Loads the history from the configured document.
    ///
    /// Never fails: a missing document means an empty history, an unreadable
    /// or corrupt one is logged and replaced by an empty history.
    pub fn open(config: &HistoryConfig) -> Self {
        Self::load(HistoryDocument::new(config.path.clone()))
    }

    pub fn load(document: HistoryDocument) -> Self {
        let history = match document.load() {
            Ok(Some(runs)) => {
                log::info!(
                    "loaded {} runs from {}",
                    runs.len(),
                    document.path().display()
                );
                RunHistory::from_runs(runs)
            }
            Ok(None) => {
                log::info!(
                    "no history at {}, starting empty",
                    document.path().display()
                );
                RunHistory::new()
            }
            Err(why) => {
                log::warn!(
                    "could not load history from {}, starting empty: {}",
                    document.path().display(),
                    why
                );
                RunHistory::new()
            }
        };
        Self {
            history,
            document,
            dirty: false,
        }
    }

    pub fn add(&mut self, run: RunSummary) -> AddOutcome {
        let evicted = self.history.insert(run);
        for run in &evicted {
            log::debug!("evicted run {}", run.id);
        }
        AddOutcome {
            evicted,
            save: self.persist(),
        }
    }

    /// Removes the run if present. The document is written either way.
    pub fn remove(&mut self, id: &Id<RunSummary>) -> RemoveOutcome {
        let removed = self.history.remove(id);
        if removed.is_none() {
            log::debug!("run {} is not in the history", id);
        }
        RemoveOutcome {
            removed,
            save: self.persist(),
        }
    }

    /// Writes the document again if an earlier write failed.
    pub fn flush(&mut self) -> SaveStatus {
        if self.dirty {
            self.persist()
        } else {
            SaveStatus::Saved
        }
    }

    pub fn snapshot(&self) -> Vec<RunSummary> {
        self.history.runs().to_vec()
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn document(&self) -> &HistoryDocument {
        &self.document
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn persist(&mut self) -> SaveStatus {
        let status = SaveStatus::from(self.document.save(self.history.runs()));
        match &status {
            SaveStatus::Saved => self.dirty = false,
            SaveStatus::Failed(why) => {
                log::warn!(
                    "could not save history to {}, keeping it in memory: {}",
                    self.document.path().display(),
                    why
                );
                self.dirty = true;
            }
        }
        status
    }
}
