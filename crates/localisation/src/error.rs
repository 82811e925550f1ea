//! Error types raised by the localisation engine.

use thiserror::Error;

/// Errors surfaced by localisation table construction.
///
/// Lookups never error: a missing key or language is `None`. Errors are
/// reserved for inputs that cannot produce a table at all; file I/O is
/// handled by the loaders in [`crate::sources`].
#[derive(Debug, Error)]
pub enum LocalisationError {
    #[error("CSV input is empty")]
    EmptyCsv,

    #[error("CSV header row declares no languages")]
    NoLanguages,
}

pub type Result<T> = std::result::Result<T, LocalisationError>;
