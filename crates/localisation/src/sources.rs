//! Localisation source configuration and file loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::LocalisationData;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Where a context finds its localisation tables.
///
/// Tables are loaded in precedence order, later sources merging on top of
/// earlier ones: the bundled default table first, then the
/// identifier-specific override, falling back to the generic user table when
/// no override is configured. Every path is optional; a configured path that
/// fails to load is a warning, never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalisationSources {
    /// Bundled default table shipped with the framework.
    #[serde(default)]
    pub default_csv: Option<PathBuf>,

    /// Per-application override table.
    #[serde(default)]
    pub override_csv: Option<PathBuf>,

    /// Generic user table, consulted only when no override is configured.
    #[serde(default)]
    pub user_csv: Option<PathBuf>,

    /// Restriction on the languages exposed for selection. Empty means
    /// "no restriction": expose the languages of the last-loaded source.
    #[serde(default)]
    pub supported_languages: Vec<String>,
}

impl LocalisationSources {
    /// Load source configuration from a TOML file.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        let sources: LocalisationSources = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse localisation sources TOML: {}", e))?;
        Ok(sources)
    }

    /// The table paths to try, in merge-precedence order.
    pub fn table_paths(&self) -> Vec<&Path> {
        let mut paths = Vec::new();
        if let Some(default) = &self.default_csv {
            paths.push(default.as_path());
        }
        match (&self.override_csv, &self.user_csv) {
            (Some(override_path), _) => paths.push(override_path.as_path()),
            (None, Some(user_path)) => paths.push(user_path.as_path()),
            (None, None) => {}
        }
        paths
    }
}

/// Loader for localisation tables from CSV files.
pub struct TableLoader;

impl TableLoader {
    /// Load a localisation table from a CSV file.
    pub fn load(path: &Path) -> LoadResult<LocalisationData> {
        let content = read_file(path)?;
        let data = LocalisationData::from_csv(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse localisation CSV {}: {}", path.display(), e))?;
        Ok(data)
    }
}

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_sources_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_csv = \"localisation/default.csv\"\nsupported_languages = [\"English\", \"French\"]"
        )
        .unwrap();

        let sources = LocalisationSources::load(file.path()).expect("TOML should parse");
        assert_eq!(
            sources.default_csv,
            Some(PathBuf::from("localisation/default.csv"))
        );
        assert_eq!(sources.override_csv, None);
        assert_eq!(sources.supported_languages, vec!["English", "French"]);
    }

    #[test]
    fn test_override_shadows_user_table() {
        let sources = LocalisationSources {
            default_csv: Some(PathBuf::from("default.csv")),
            override_csv: Some(PathBuf::from("override.csv")),
            user_csv: Some(PathBuf::from("user.csv")),
            supported_languages: vec![],
        };
        assert_eq!(
            sources.table_paths(),
            vec![Path::new("default.csv"), Path::new("override.csv")]
        );
    }

    #[test]
    fn test_user_table_is_fallback() {
        let sources = LocalisationSources {
            default_csv: None,
            override_csv: None,
            user_csv: Some(PathBuf::from("user.csv")),
            supported_languages: vec![],
        };
        assert_eq!(sources.table_paths(), vec![Path::new("user.csv")]);
    }

    #[test]
    fn test_table_loader_reads_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Key,English\nKey1,Hello\n").unwrap();

        let data = TableLoader::load(file.path()).expect("CSV should load");
        assert_eq!(data.get_text("Key1", "English"), Some("Hello"));
    }

    #[test]
    fn test_table_loader_missing_file_is_error() {
        assert!(TableLoader::load(Path::new("/nonexistent/l10n.csv")).is_err());
    }
}
