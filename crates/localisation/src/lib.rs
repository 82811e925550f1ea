//! Localisation engine: CSV-backed language/key tables and selection.
//!
//! This crate provides the localisation half of the framework plumbing:
//! - [`csv`]: a streaming CSV reader handling quoted fields, escaped quotes,
//!   and multi-line cell content
//! - [`data`]: the in-memory table of languages × keys, with lockstep-resize
//!   invariants and order-significant merge
//! - [`sources`]: file-based source configuration (TOML) and table loading
//! - [`context`]: an explicit context object that merges sources, resolves
//!   and persists the active language, and serves text lookups
//!
//! Everything is synchronous; lookups are `Option`-returning ("not found"
//! and "found but empty" are distinguishable) and loading failures degrade
//! to warnings rather than crashing consumers.

pub mod context;
pub mod csv;
pub mod data;
pub mod error;
pub mod notify;
pub mod sources;

pub use context::{LANGUAGE_PREF_KEY, LocalisationContext};
pub use csv::CsvRows;
pub use data::{DEFAULT_LANGUAGE, Language, LocalisationData, LocalisationEntry};
pub use error::{LocalisationError, Result};
pub use notify::{LanguageChange, LanguageSink};
pub use sources::{LoadResult, LocalisationSources, TableLoader};
