use std::{env, path::PathBuf};

pub const HISTORY_PATH_ENV: &str = "RUN_HISTORY_PATH";
pub const DEFAULT_FILE_NAME: &str = "runs.json";

/// Where the history document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

impl HistoryConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Option<Self> {
        let path = env::var_os(HISTORY_PATH_ENV)?;
        if path.is_empty() {
            return None;
        }
        Some(Self::new(path))
    }
}

impl Default for HistoryConfig {
    /// `runs.json` in the working directory.
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}
