//! Flat string-keyed preference storage.
//!
//! A preference store is the persistence collaborator for the rest of the
//! framework: the localisation context saves the chosen language here, and
//! counters save their amounts and high-water marks here. The store is a
//! plain key/value surface with typed accessors and an explicit [`save`]
//! flush; there are no transactions and no change notifications.
//!
//! Two implementations are provided:
//! - [`InMemoryPrefs`]: backed by a `HashMap`, for tests and local runs
//! - [`FilePrefs`]: backed by a JSON file, flushed atomically on `save()`
//!
//! [`save`]: PreferenceStore::save

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{PrefsError, Result};
pub use file::FilePrefs;
pub use memory::InMemoryPrefs;
pub use store::{PrefValue, PreferenceStore};
