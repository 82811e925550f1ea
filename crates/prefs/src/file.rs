//! File-based PreferenceStore implementation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use directories::ProjectDirs;

use crate::error::{PrefsError, Result};
use crate::store::{PrefValue, PreferenceStore};

/// File-based implementation of [`PreferenceStore`].
///
/// Values live in memory and are written out as a single JSON document when
/// `save()` is called. The flush goes through a temp file and an atomic
/// rename, so a crash mid-save leaves the previous file intact.
pub struct FilePrefs {
    path: PathBuf,
    values: RwLock<HashMap<String, PrefValue>>,
}

impl FilePrefs {
    /// Open a preference file, loading existing values if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let bytes = fs::read(&path).map_err(PrefsError::Io)?;
            serde_json::from_slice(&bytes).map_err(|e| PrefsError::Json(e.to_string()))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Open the default preference file for an application, placed in the
    /// platform data directory (e.g. `~/.local/share/<app>/prefs.json`).
    pub fn open_default(app_name: &str) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", app_name).ok_or(PrefsError::NoStorageDir)?;
        fs::create_dir_all(dirs.data_dir()).map_err(PrefsError::Io)?;
        Self::open(dirs.data_dir().join("prefs.json"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
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

impl PreferenceStore for FilePrefs {
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
        let values = self.values.read().map_err(|_| PrefsError::LockPoisoned)?;
        let bytes =
            serde_json::to_vec_pretty(&*values).map_err(|e| PrefsError::Json(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, bytes).map_err(PrefsError::Io)?;
        fs::rename(&temp_path, &self.path).map_err(PrefsError::Io)?;

        tracing::debug!("Saved {} preferences to {}", values.len(), self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = FilePrefs::open(&path).unwrap();
        prefs.set_int("lives", 3).unwrap();
        prefs.set_string("Language", "French").unwrap();
        prefs.save().unwrap();

        let reopened = FilePrefs::open(&path).unwrap();
        assert_eq!(reopened.int("lives"), Some(3));
        assert_eq!(reopened.string("Language"), Some("French".to_string()));
    }

    #[test]
    fn test_unsaved_writes_are_not_flushed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = FilePrefs::open(&path).unwrap();
        prefs.set_int("lives", 3).unwrap();
        drop(prefs);

        let reopened = FilePrefs::open(&path).unwrap();
        assert_eq!(reopened.int("lives"), None);
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("absent.json")).unwrap();
        assert!(!prefs.has_key("anything"));
    }
}
