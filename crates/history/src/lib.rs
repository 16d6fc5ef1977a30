//! The bounded, persisted list of recently imported runs.
//!
//! [`RunHistory`] is the plain newest-first list, [`HistoryDocument`] the JSON
//! file it is stored in, and [`RunHistoryStore`] keeps both in step. The
//! [`service`] module puts a store behind a single task so that mutations from
//! anywhere in a program are applied one after another.

use std::io;

use model::RunSummary;

pub mod config;
pub mod document;
pub mod list;
pub mod service;
pub mod store;

pub use config::HistoryConfig;
pub use document::HistoryDocument;
pub use list::{RunHistory, CAPACITY};
pub use service::{HistoryHandle, HistoryService};
pub use store::RunHistoryStore;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("history document I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("history document is not valid: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("history could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("the history service is not running")]
    Closed,
    #[error("the history service dropped the request")]
    NoResponse,
}

/// Whether the document caught up with the in-memory history.
///
/// A failed save leaves the in-memory history untouched. It is written again
/// on the next mutation or [`RunHistoryStore::flush`].
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    Failed(PersistenceError),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

impl From<Result<(), PersistenceError>> for SaveStatus {
    fn from(result: Result<(), PersistenceError>) -> Self {
        match result {
            Ok(()) => SaveStatus::Saved,
            Err(why) => SaveStatus::Failed(why),
        }
    }
}

#[derive(Debug)]
pub struct AddOutcome {
    /// Runs pushed out at the old end of the history.
    pub evicted: Vec<RunSummary>,
    pub save: SaveStatus,
}

#[derive(Debug)]
pub struct RemoveOutcome {
    pub removed: Option<RunSummary>,
    pub save: SaveStatus,
}
