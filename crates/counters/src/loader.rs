//! Counter catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::CounterConfiguration;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Counter catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterCatalog {
    pub counters: Vec<CounterConfiguration>,
}

/// Loader for counter configurations from RON files.
pub struct CounterLoader;

impl CounterLoader {
    /// Load counter configurations from a RON file.
    ///
    /// Both bounds pairs of every counter are validated; an inverted range
    /// (or a NaN float bound) is a load error rather than a latent runtime
    /// surprise.
    pub fn load(path: &Path) -> LoadResult<Vec<CounterConfiguration>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
        let catalog: CounterCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse counter catalog RON: {}", e))?;

        for config in &catalog.counters {
            if config.int_minimum > config.int_maximum {
                anyhow::bail!(
                    "Counter {:?} has inverted int bounds: {} > {}",
                    config.name,
                    config.int_minimum,
                    config.int_maximum,
                );
            }
            // The negated form also rejects NaN bounds.
            if !(config.float_minimum <= config.float_maximum) {
                anyhow::bail!(
                    "Counter {:?} has invalid float bounds: {} .. {}",
                    config.name,
                    config.float_minimum,
                    config.float_maximum,
                );
            }
        }

        Ok(catalog.counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::config::{CounterKind, SaveType};

    #[test]
    fn test_load_counter_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    counters: [
        (
            name: "Score",
            save_best: Always,
        ),
        (
            name: "Health",
            kind: Float,
            float_minimum: 0.0,
            float_maximum: 1.0,
            float_default: 1.0,
        ),
    ],
)"#
        )
        .unwrap();

        let counters = CounterLoader::load(file.path()).expect("catalog should parse");
        assert_eq!(counters.len(), 2);

        assert_eq!(counters[0].name, "Score");
        assert_eq!(counters[0].kind, CounterKind::Int);
        assert_eq!(counters[0].save, SaveType::None);
        assert_eq!(counters[0].save_best, SaveType::Always);
        assert_eq!(counters[0].int_maximum, i32::MAX);

        assert_eq!(counters[1].name, "Health");
        assert_eq!(counters[1].kind, CounterKind::Float);
        assert_eq!(counters[1].float_default, 1.0);
    }

    #[test]
    fn test_inverted_bounds_are_a_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    counters: [
        (
            name: "Broken",
            int_minimum: 10,
            int_maximum: 5,
        ),
    ],
)"#
        )
        .unwrap();

        let err = CounterLoader::load(file.path()).expect_err("inverted bounds should fail");
        assert!(err.to_string().contains("inverted int bounds"));
    }

    #[test]
    fn test_inverted_float_bounds_are_a_load_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
    counters: [
        (
            name: "Broken",
            kind: Float,
            float_minimum: 1.0,
            float_maximum: 0.5,
        ),
    ],
)"#
        )
        .unwrap();

        assert!(CounterLoader::load(file.path()).is_err());
    }

    #[test]
    fn test_malformed_catalog_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(counters: [").unwrap();
        assert!(CounterLoader::load(file.path()).is_err());
    }
}
