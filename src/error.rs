// ⚠️ Error taxonomy
// Only DataUnavailable and MissingCredential stop the process.
// Per-request failures (validation, degraded lookups) live next to the code
// that produces them and never leave the request that caused them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Bundled BIN dataset missing, unreadable or unparseable
    #[error("BIN dataset unavailable at {path:?}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// Required environment variable not set
    #[error("missing required environment variable {0}")]
    MissingCredential(&'static str),

    /// Environment variable set to something we cannot use
    #[error("invalid value for {var}: {value:?}")]
    InvalidConfig { var: &'static str, value: String },
}

impl Error {
    pub(crate) fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
