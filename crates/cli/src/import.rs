use std::path::PathBuf;

use anyhow::Context;
use model::Track;
use tokio::{task, time};
use tokio_util::sync::CancellationToken;

use crate::config::ImportConfig;

/// Parses and post-processes the recording at `path` on the blocking pool.
///
/// With a timeout configured the parser is cancelled once it elapses and the
/// import fails without producing a track.
pub async fn load_track(path: PathBuf, config: &ImportConfig) -> anyhow::Result<Track> {
    load_track_cancellable(path, config, CancellationToken::new()).await
}

/// Like [`load_track`], cancelling `cancel` when the timeout elapses or the
/// returned future is dropped before the parser finished.
pub async fn load_track_cancellable(
    path: PathBuf,
    config: &ImportConfig,
    cancel: CancellationToken,
) -> anyhow::Result<Track> {
    let parse = task::spawn_blocking({
        let cancel = cancel.clone();
        let path = path.clone();
        move || gpx::parse_file_cancellable(&path, &cancel)
    });
    let guard = cancel.drop_guard();

    let joined = match config.timeout {
        Some(timeout) => time::timeout(timeout, parse).await.with_context(|| {
            format!("parsing {} took longer than {:?}", path.display(), timeout)
        })?,
        None => parse.await,
    };
    guard.disarm();

    let samples = joined
        .context("parser task failed")?
        .with_context(|| format!("could not import {}", path.display()))?;
    log::debug!("{} samples in {}", samples.len(), path.display());
    Ok(analysis::build_track(samples))
}
