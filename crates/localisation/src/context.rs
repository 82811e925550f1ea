//! Localisation context: loading, language selection, and lookup.

use std::sync::Arc;

use gamekit_prefs::PreferenceStore;

use crate::data::{DEFAULT_LANGUAGE, LocalisationData};
use crate::notify::{LanguageChange, LanguageSink};
use crate::sources::{LocalisationSources, TableLoader};

/// Preference key under which the chosen language is persisted.
pub const LANGUAGE_PREF_KEY: &str = "Language";

/// Everything derived by a load: the merged table, the languages exposed for
/// selection, and the resolved active language.
struct LoadedState {
    data: LocalisationData,
    supported_languages: Vec<String>,
    active_language: Option<String>,
}

/// Owns the merged localisation table and the active language.
///
/// An explicit context object passed to consumers; construct one per
/// process (or per test) instead of reaching for global state. The context
/// is lazily loaded on first access; [`clear`] drops back to the unloaded
/// state and [`reload`] re-derives everything from the configured sources.
///
/// # Loading
///
/// Sources load in precedence order with later tables merging on top of
/// earlier ones, so override values win per (key, language) pair. When no
/// source yields a table at all, an empty table with one default language
/// is synthesized; the context never operates on a missing table.
///
/// # Active language resolution
///
/// First match wins: the persisted preference, the host system language
/// (matched by name or ISO code against the supported set), the first
/// supported language, the first language in the table.
///
/// [`clear`]: LocalisationContext::clear
/// [`reload`]: LocalisationContext::reload
pub struct LocalisationContext {
    sources: LocalisationSources,
    prefs: Arc<dyn PreferenceStore>,
    system_language: Option<String>,
    sinks: Vec<Box<dyn LanguageSink>>,
    state: Option<LoadedState>,
}

impl LocalisationContext {
    /// Create an unloaded context over the given sources and preference
    /// store.
    pub fn new(sources: LocalisationSources, prefs: Arc<dyn PreferenceStore>) -> Self {
        Self {
            sources,
            prefs,
            system_language: None,
            sinks: Vec::new(),
            state: None,
        }
    }

    /// Override the host system language used during resolution.
    ///
    /// Without this, the language is derived from the `LC_ALL`/`LANG`
    /// environment. Accepts a language name or an ISO code.
    pub fn with_system_language(mut self, language: impl Into<String>) -> Self {
        self.system_language = Some(language.into());
        self
    }

    /// Register a sink for language-change events.
    pub fn add_sink(&mut self, sink: impl LanguageSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Whether the context has loaded its sources.
    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// Load the configured sources. A no-op once loaded.
    pub fn load(&mut self) {
        if self.state.is_none() {
            let state = self.build_state();
            self.state = Some(state);
        }
    }

    /// Drop back to the unloaded state.
    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Re-derive the table and active language from the sources.
    pub fn reload(&mut self) {
        self.clear();
        self.load();
    }

    /// Load if needed and hand out the state.
    fn loaded(&mut self) -> &mut LoadedState {
        if self.state.is_none() {
            let state = self.build_state();
            self.state = Some(state);
        }
        match &mut self.state {
            Some(state) => state,
            None => unreachable!("context state populated by load"),
        }
    }

    /// The merged localisation table, loading on first access.
    pub fn data(&mut self) -> &LocalisationData {
        &self.loaded().data
    }

    /// Languages exposed for user selection, loading on first access.
    pub fn supported_languages(&mut self) -> &[String] {
        &self.loaded().supported_languages
    }

    /// The active language, loading on first access.
    pub fn active_language(&mut self) -> Option<&str> {
        self.loaded().active_language.as_deref()
    }

    /// Whether a language can be selected.
    pub fn can_use_language(&mut self, name: &str) -> bool {
        self.loaded()
            .supported_languages
            .iter()
            .any(|l| l == name)
    }

    /// Change the active language.
    ///
    /// Rejected (returns `false`, state unchanged) when the language is
    /// unknown or not in the supported set. On success the new language is
    /// persisted under [`LANGUAGE_PREF_KEY`] and a [`LanguageChange`] is
    /// published to every registered sink. Re-selecting the current
    /// language succeeds without persisting or notifying.
    pub fn set_language(&mut self, name: &str) -> bool {
        if !self.can_use_language(name) {
            tracing::debug!("Rejected unsupported language {:?}", name);
            return false;
        }

        let state = self.loaded();
        if state.active_language.as_deref() == Some(name) {
            return true;
        }

        let old_language = state.active_language.replace(name.to_string());

        if let Err(e) = self
            .prefs
            .set_string(LANGUAGE_PREF_KEY, name)
            .and_then(|()| self.prefs.save())
        {
            tracing::warn!("Failed to persist language choice: {}", e);
        }

        let change = LanguageChange {
            new_language: name.to_string(),
            old_language,
        };
        tracing::trace!("Publishing language change to {} sinks", self.sinks.len());
        for sink in &self.sinks {
            sink.language_changed(&change);
        }
        true
    }

    /// Resolve the text for a key in the active language.
    pub fn text(&mut self, key: &str) -> Option<&str> {
        let state = self.loaded();
        let active = state.active_language.as_deref()?;
        state.data.get_text(key, active)
    }

    /// Resolve the text for a key in a specific language.
    pub fn text_in(&mut self, key: &str, language: &str) -> Option<&str> {
        let state = self.loaded();
        state.data.get_text(key, language)
    }

    fn build_state(&self) -> LoadedState {
        let mut merged: Option<LocalisationData> = None;
        let mut last_loaded: Vec<String> = Vec::new();

        for path in self.sources.table_paths() {
            match TableLoader::load(path) {
                Ok(table) => {
                    last_loaded = table.language_names().iter().map(|s| s.to_string()).collect();
                    match &mut merged {
                        Some(base) => base.merge(&table),
                        None => merged = Some(table),
                    }
                    tracing::debug!("Loaded localisation table from {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Skipping localisation source {}: {}", path.display(), e);
                }
            }
        }

        let data = merged.unwrap_or_else(|| {
            tracing::warn!("No localisation data found; starting with an empty table");
            let mut table = LocalisationData::new();
            table.add_language(DEFAULT_LANGUAGE, "en");
            table
        });
        if last_loaded.is_empty() {
            last_loaded = data.language_names().iter().map(|s| s.to_string()).collect();
        }

        let supported_languages = self.resolve_supported(&data, last_loaded);
        let active_language = self.resolve_active(&data, &supported_languages);
        if let Some(active) = &active_language {
            tracing::debug!("Active language resolved to {:?}", active);
        }

        LoadedState {
            data,
            supported_languages,
            active_language,
        }
    }

    /// Intersect the configured restriction with the languages actually
    /// present; an empty restriction exposes the last-loaded source's
    /// languages.
    fn resolve_supported(&self, data: &LocalisationData, last_loaded: Vec<String>) -> Vec<String> {
        if self.sources.supported_languages.is_empty() {
            return last_loaded;
        }

        let mut supported = Vec::new();
        for name in &self.sources.supported_languages {
            if data.contains_language(name) {
                supported.push(name.clone());
            } else {
                tracing::warn!(
                    "Configured language {:?} not present in localisation data; ignoring",
                    name
                );
            }
        }
        if supported.is_empty() {
            tracing::warn!("No configured language is present; exposing all loaded languages");
            return data.language_names().iter().map(|s| s.to_string()).collect();
        }
        supported
    }

    fn resolve_active(&self, data: &LocalisationData, supported: &[String]) -> Option<String> {
        // (a) previously persisted preference
        if let Some(saved) = self.prefs.string(LANGUAGE_PREF_KEY)
            && supported.iter().any(|l| *l == saved)
        {
            return Some(saved);
        }

        // (b) host system language, by name or ISO code
        if let Some(host) = self.system_language.clone().or_else(host_language) {
            for name in supported {
                let matches = name.eq_ignore_ascii_case(&host)
                    || data
                        .language_index(name)
                        .map(|i| data.languages()[i].code.eq_ignore_ascii_case(&host))
                        .unwrap_or(false);
                if matches {
                    return Some(name.clone());
                }
            }
        }

        // (c) first supported, (d) first language in the table
        supported
            .first()
            .cloned()
            .or_else(|| data.languages().first().map(|l| l.name.clone()))
    }
}

/// Language code from the process environment, e.g. `en` out of
/// `en_US.UTF-8`.
fn host_language() -> Option<String> {
    let locale = std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LANG"))
        .ok()?;
    let code: String = locale
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if code.is_empty() { None } else { Some(code) }
}
