//! Counter configuration descriptors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Numeric type a counter tracks. Exactly one of a counter's int or float
/// value pairs is meaningful, selected by this kind.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum CounterKind {
    #[default]
    Int,
    Float,
}

/// Policy controlling whether a counter field is written to the preference
/// store.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum SaveType {
    /// Never persisted; an existing stored value is neither read nor
    /// deleted.
    #[default]
    None,
    /// Persisted on every explicit write, read back on load.
    Always,
}

impl SaveType {
    pub fn is_always(self) -> bool {
        matches!(self, SaveType::Always)
    }
}

/// Immutable-once-constructed descriptor for a named counter.
///
/// Bounds and defaults exist for both numeric kinds so a configuration can
/// be authored in data files without knowing which pair applies; only the
/// pair matching [`kind`] is consulted at runtime.
///
/// [`kind`]: CounterConfiguration::kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfiguration {
    pub name: String,
    #[serde(default)]
    pub kind: CounterKind,

    #[serde(default)]
    pub int_minimum: i32,
    #[serde(default = "int_maximum_default")]
    pub int_maximum: i32,
    #[serde(default)]
    pub int_default: i32,

    #[serde(default)]
    pub float_minimum: f32,
    #[serde(default = "float_maximum_default")]
    pub float_maximum: f32,
    #[serde(default)]
    pub float_default: f32,

    #[serde(default)]
    pub save: SaveType,
    #[serde(default)]
    pub save_best: SaveType,
}

fn int_maximum_default() -> i32 {
    i32::MAX
}

fn float_maximum_default() -> f32 {
    f32::MAX
}

impl CounterConfiguration {
    /// An int counter with open bounds and a zero default.
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CounterKind::Int,
            int_minimum: 0,
            int_maximum: i32::MAX,
            int_default: 0,
            float_minimum: 0.0,
            float_maximum: f32::MAX,
            float_default: 0.0,
            save: SaveType::None,
            save_best: SaveType::None,
        }
    }

    /// A float counter with open bounds and a zero default.
    pub fn float(name: impl Into<String>) -> Self {
        Self {
            kind: CounterKind::Float,
            ..Self::int(name)
        }
    }

    pub fn with_int_range(mut self, minimum: i32, maximum: i32) -> Self {
        self.int_minimum = minimum;
        self.int_maximum = maximum;
        self
    }

    pub fn with_int_default(mut self, default: i32) -> Self {
        self.int_default = default;
        self
    }

    pub fn with_float_range(mut self, minimum: f32, maximum: f32) -> Self {
        self.float_minimum = minimum;
        self.float_maximum = maximum;
        self
    }

    pub fn with_float_default(mut self, default: f32) -> Self {
        self.float_default = default;
        self
    }

    pub fn with_save(mut self, save: SaveType) -> Self {
        self.save = save;
        self
    }

    pub fn with_save_best(mut self, save_best: SaveType) -> Self {
        self.save_best = save_best;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_builder_defaults() {
        let config = CounterConfiguration::int("Score");
        assert_eq!(config.kind, CounterKind::Int);
        assert_eq!(config.int_minimum, 0);
        assert_eq!(config.int_maximum, i32::MAX);
        assert_eq!(config.save, SaveType::None);
    }

    #[test]
    fn test_builder_chain() {
        let config = CounterConfiguration::int("Lives")
            .with_int_range(0, 10)
            .with_int_default(3)
            .with_save(SaveType::Always);
        assert_eq!(config.int_maximum, 10);
        assert_eq!(config.int_default, 3);
        assert!(config.save.is_always());
        assert!(!config.save_best.is_always());
    }

    #[test]
    fn test_save_type_parses_from_string() {
        use std::str::FromStr;
        assert_eq!(SaveType::from_str("Always").unwrap(), SaveType::Always);
        assert_eq!(SaveType::from_str("None").unwrap(), SaveType::None);
        assert!(SaveType::from_str("Sometimes").is_err());
    }
}
