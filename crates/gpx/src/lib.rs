//! Streaming reader for GPX track recordings.
//!
//! Only `trkpt` elements are read: their `lat`/`lon` attributes, the optional
//! `ele` child and the required `time` child. Points without a usable
//! position or timestamp are skipped. Malformed XML fails the whole document.

use std::{fs::File, io, path::Path, sync::Arc};

use model::RawSample;
use tokio_util::sync::CancellationToken;

mod parser;

pub use parser::parse_reader_cancellable;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not read document: {0}")]
    Io(#[from] io::Error),
    #[error("malformed document at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    #[error("parsing was cancelled")]
    Cancelled,
}

impl ParseError {
    pub(crate) fn from_xml(why: quick_xml::Error, position: u64) -> Self {
        match why {
            quick_xml::Error::Io(source) => Self::Io(
                Arc::try_unwrap(source)
                    .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string())),
            ),
            other => Self::Syntax {
                position,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn syntax<S: Into<String>>(position: u64, message: S) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Reads all track points from `reader`.
pub fn parse_reader<R: io::Read>(reader: R) -> Result<Vec<RawSample>, ParseError> {
    parse_reader_cancellable(reader, &CancellationToken::new())
}

pub fn parse_str(document: &str) -> Result<Vec<RawSample>, ParseError> {
    parse_reader(document.as_bytes())
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawSample>, ParseError> {
    parse_file_cancellable(path, &CancellationToken::new())
}

pub fn parse_file_cancellable<P: AsRef<Path>>(
    path: P,
    cancel: &CancellationToken,
) -> Result<Vec<RawSample>, ParseError> {
    let path = path.as_ref();
    log::info!("parsing {}", path.display());
    let file = File::open(path)?;
    parse_reader_cancellable(file, cancel)
}
