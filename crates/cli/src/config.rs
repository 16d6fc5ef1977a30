use std::{env, time::Duration};

pub const IMPORT_TIMEOUT_ENV: &str = "RUN_IMPORT_TIMEOUT_SECS";

/// Limits applied while importing a recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportConfig {
    /// Parsing is cancelled once this much time has passed.
    pub timeout: Option<Duration>,
}

impl ImportConfig {
    pub fn from_env() -> Option<Self> {
        let value = env::var(IMPORT_TIMEOUT_ENV).ok()?;
        match parse_timeout(&value) {
            Some(timeout) => Some(Self {
                timeout: Some(timeout),
            }),
            None => {
                log::warn!("ignoring {}={:?}", IMPORT_TIMEOUT_ENV, value);
                None
            }
        }
    }
}

/// Whole seconds, greater than zero.
pub fn parse_timeout(value: &str) -> Option<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(seconds) => Some(Duration::from_secs(seconds)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_whole_positive_seconds() {
        assert_eq!(parse_timeout("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout(" 5 "), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("-3"), None);
        assert_eq!(parse_timeout("1.5"), None);
        assert_eq!(parse_timeout(""), None);
    }
}
