//! Preference store contract.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single stored preference value.
///
/// Values keep the type they were written with; reading a key through an
/// accessor of a different type returns `None` rather than coercing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrefValue {
    Int(i32),
    Float(f32),
    Text(String),
}

/// Flat string-keyed preference storage.
///
/// Getters return `None` for an absent key or a key stored under a different
/// type; absence is never an error. Setters take effect immediately in
/// memory; [`save`] flushes to the backing medium (a no-op for purely
/// in-memory implementations).
///
/// [`save`]: PreferenceStore::save
pub trait PreferenceStore: Send + Sync {
    /// Read an integer preference.
    fn int(&self, key: &str) -> Option<i32>;

    /// Write an integer preference.
    fn set_int(&self, key: &str, value: i32) -> Result<()>;

    /// Read a float preference.
    fn float(&self, key: &str) -> Option<f32>;

    /// Write a float preference.
    fn set_float(&self, key: &str, value: f32) -> Result<()>;

    /// Read a string preference.
    fn string(&self, key: &str) -> Option<String>;

    /// Write a string preference.
    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Check whether a key exists, regardless of its type.
    fn has_key(&self, key: &str) -> bool;

    /// Remove a key. Removing an absent key is a no-op.
    fn delete(&self, key: &str) -> Result<()>;

    /// Flush pending writes to the backing medium.
    fn save(&self) -> Result<()>;
}
