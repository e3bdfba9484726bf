//! Error types for configuration and storage.
//!
//! The simulation itself never fails; these only surface from the
//! collaborators that touch the outside world.

use std::fmt;

/// Errors arising from settings, tuning or leaderboard storage.
#[derive(Debug)]
pub enum Error {
    /// Filesystem access failed.
    Io(std::io::Error),
    /// Stored data could not be encoded or decoded.
    Json(serde_json::Error),
    /// A configuration value is out of its valid range.
    InvalidConfig {
        /// Which field was rejected.
        field: &'static str,
        /// Human-readable description of the valid range.
        reason: String,
    },
    /// The storage backend is not available on this platform.
    Storage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Json(e) => write!(f, "malformed data: {e}"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config `{field}`: {reason}")
            }
            Self::Storage(reason) => write!(f, "storage unavailable: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
