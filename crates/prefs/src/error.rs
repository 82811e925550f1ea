//! Error types raised by preference store implementations.

use thiserror::Error;

/// Errors surfaced by preference store implementations.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("no writable directory available for preference storage")]
    NoStorageDir,
}

pub type Result<T> = std::result::Result<T, PrefsError>;
