//! In-memory PreferenceStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PrefsError, Result};
use crate::store::{PrefValue, PreferenceStore};

/// In-memory implementation of [`PreferenceStore`].
///
/// Holds values in a `HashMap`; `save()` is a no-op. Useful for tests and
/// for runs where persistence across restarts is not wanted.
pub struct InMemoryPrefs {
    values: RwLock<HashMap<String, PrefValue>>,
}

impl InMemoryPrefs {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: PrefValue) -> Result<()> {
        let mut values = self.values.write().map_err(|_| PrefsError::LockPoisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

impl Default for InMemoryPrefs {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for InMemoryPrefs {
    fn int(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            PrefValue::Int(v) => Some(v),
            _ => None,
        }
    }

    fn set_int(&self, key: &str, value: i32) -> Result<()> {
        self.set(key, PrefValue::Int(value))
    }

    fn float(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            PrefValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn set_float(&self, key: &str, value: f32) -> Result<()> {
        self.set(key, PrefValue::Float(value))
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            PrefValue::Text(v) => Some(v),
            _ => None,
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.set(key, PrefValue::Text(value.to_string()))
    }

    fn has_key(&self, key: &str) -> bool {
        self.values
            .read()
            .map(|values| values.contains_key(key))
            .unwrap_or(false)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| PrefsError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }

    fn save(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let prefs = InMemoryPrefs::new();
        prefs.set_int("lives", 3).unwrap();
        prefs.set_float("volume", 0.5).unwrap();
        prefs.set_string("Language", "English").unwrap();

        assert_eq!(prefs.int("lives"), Some(3));
        assert_eq!(prefs.float("volume"), Some(0.5));
        assert_eq!(prefs.string("Language"), Some("English".to_string()));
    }

    #[test]
    fn test_absent_key_is_none() {
        let prefs = InMemoryPrefs::new();
        assert_eq!(prefs.int("missing"), None);
        assert!(!prefs.has_key("missing"));
    }

    #[test]
    fn test_type_mismatch_is_none() {
        let prefs = InMemoryPrefs::new();
        prefs.set_int("lives", 3).unwrap();
        assert_eq!(prefs.float("lives"), None);
        assert_eq!(prefs.string("lives"), None);
        assert!(prefs.has_key("lives"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let prefs = InMemoryPrefs::new();
        prefs.set_int("lives", 3).unwrap();
        prefs.delete("lives").unwrap();
        prefs.delete("lives").unwrap();
        assert!(!prefs.has_key("lives"));
    }
}
