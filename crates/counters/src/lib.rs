//! Named, bounded, optionally-persisted numeric counters.
//!
//! A [`CounterConfiguration`] describes a counter (numeric kind, bounds,
//! default, and save policy) and is typically authored in a RON catalog
//! loaded via [`CounterLoader`]. A [`Counter`] is the mutable runtime
//! instance: gameplay code sets or increments it, values clamp to the
//! configured bounds, a best-value high-water mark is tracked, and explicit
//! persistence calls read/write a [`PreferenceStore`] under a fixed key
//! layout.
//!
//! [`PreferenceStore`]: gamekit_prefs::PreferenceStore

pub mod config;
pub mod counter;
pub mod loader;

pub use config::{CounterConfiguration, CounterKind, SaveType};
pub use counter::{Counter, CounterChange, CounterValue};
pub use loader::{CounterCatalog, CounterLoader, LoadResult};
