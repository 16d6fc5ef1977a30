//! A single task that owns the history store.
//!
//! Every [`HistoryHandle`] feeds the same bounded queue, so adds and removes
//! coming from different parts of a program are applied strictly one after
//! another. Document I/O runs on the blocking pool; the owning task only waits
//! for it and answers over a oneshot channel.

use std::sync::{Arc, Mutex, PoisonError};

use model::RunSummary;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task,
};
use utility::id::Id;

use crate::{
    AddOutcome, HistoryConfig, HistoryError, RemoveOutcome, RunHistoryStore, SaveStatus,
};

const MAILBOX_SIZE: usize = 32;

#[derive(Debug)]
enum Command {
    Add {
        run: RunSummary,
        responder: oneshot::Sender<AddOutcome>,
    },
    Remove {
        id: Id<RunSummary>,
        responder: oneshot::Sender<RemoveOutcome>,
    },
    Snapshot {
        responder: oneshot::Sender<Vec<RunSummary>>,
    },
    Flush {
        responder: oneshot::Sender<SaveStatus>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Snapshot { .. } => "snapshot",
            Command::Flush { .. } => "flush",
        }
    }
}

pub struct HistoryService;

impl HistoryService {
    /// Loads the history on the blocking pool and starts the owning task.
    pub async fn open(config: HistoryConfig) -> Result<HistoryHandle, HistoryError> {
        let store = task::spawn_blocking(move || RunHistoryStore::open(&config))
            .await
            .map_err(|why| {
                log::error!("loading the history panicked: {:?}", why);
                HistoryError::NoResponse
            })?;
        Ok(Self::run(store))
    }

    /// Starts the owning task for an already loaded store. Must be called from
    /// within a tokio runtime.
    pub fn run(store: RunHistoryStore) -> HistoryHandle {
        let (tx, mut rx) = mpsc::channel::<Command>(MAILBOX_SIZE);
        let (changes_tx, changes_rx) = watch::channel(store.snapshot());
        let store = Arc::new(Mutex::new(store));

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                let name = command.name();
                if let Err(why) = handle(&store, &changes_tx, command).await {
                    log::error!("history {} command panicked: {:?}", name, why);
                }
            }
            // all handles are gone
            let store = Arc::clone(&store);
            let _ = task::spawn_blocking(move || {
                if let SaveStatus::Failed(why) = lock(&store).flush() {
                    log::error!("history was not saved before shutdown: {}", why);
                }
            })
            .await;
        });

        HistoryHandle {
            sender: tx,
            changes: changes_rx,
        }
    }
}

fn lock(store: &Mutex<RunHistoryStore>) -> std::sync::MutexGuard<'_, RunHistoryStore> {
    // a panic mid-command leaves the list itself consistent
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn blocking<T, F>(store: &Arc<Mutex<RunHistoryStore>>, f: F) -> Result<T, task::JoinError>
where
    T: Send + 'static,
    F: FnOnce(&mut RunHistoryStore) -> T + Send + 'static,
{
    let store = Arc::clone(store);
    task::spawn_blocking(move || f(&mut *lock(&store))).await
}

async fn handle(
    store: &Arc<Mutex<RunHistoryStore>>,
    changes: &watch::Sender<Vec<RunSummary>>,
    command: Command,
) -> Result<(), task::JoinError> {
    match command {
        Command::Add { run, responder } => {
            let (outcome, snapshot) = blocking(store, move |store| {
                let outcome = store.add(run);
                (outcome, store.snapshot())
            })
            .await?;
            changes.send_replace(snapshot);
            respond(responder, outcome);
        }
        Command::Remove { id, responder } => {
            let (outcome, snapshot) = blocking(store, move |store| {
                let outcome = store.remove(&id);
                let snapshot = outcome.removed.is_some().then(|| store.snapshot());
                (outcome, snapshot)
            })
            .await?;
            if let Some(snapshot) = snapshot {
                changes.send_replace(snapshot);
            }
            respond(responder, outcome);
        }
        Command::Snapshot { responder } => {
            let snapshot = blocking(store, |store| store.snapshot()).await?;
            respond(responder, snapshot);
        }
        Command::Flush { responder } => {
            let status = blocking(store, |store| store.flush()).await?;
            respond(responder, status);
        }
    }
    Ok(())
}

fn respond<T>(responder: oneshot::Sender<T>, value: T) {
    if responder.send(value).is_err() {
        log::debug!("history caller went away before the response");
    }
}

/// Cheap, cloneable access to the history task.
#[derive(Debug, Clone)]
pub struct HistoryHandle {
    sender: mpsc::Sender<Command>,
    changes: watch::Receiver<Vec<RunSummary>>,
}

impl HistoryHandle {
    pub async fn add(&self, run: RunSummary) -> Result<AddOutcome, HistoryError> {
        self.ask(|responder| Command::Add { run, responder }).await
    }

    pub async fn remove(&self, id: Id<RunSummary>) -> Result<RemoveOutcome, HistoryError> {
        self.ask(|responder| Command::Remove { id, responder }).await
    }

    /// The current list, newest first.
    pub async fn snapshot(&self) -> Result<Vec<RunSummary>, HistoryError> {
        self.ask(|responder| Command::Snapshot { responder }).await
    }

    /// Retries a save that failed earlier.
    pub async fn flush(&self) -> Result<SaveStatus, HistoryError> {
        self.ask(|responder| Command::Flush { responder }).await
    }

    /// Observes the list after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<RunSummary>> {
        self.changes.clone()
    }

    async fn ask<T, F>(&self, command: F) -> Result<T, HistoryError>
    where
        F: FnOnce(oneshot::Sender<T>) -> Command,
    {
        let (responder, response) = oneshot::channel();
        self.sender
            .send(command(responder))
            .await
            .map_err(|_| HistoryError::Closed)?;
        response.await.map_err(|_| HistoryError::NoResponse)
    }
}
