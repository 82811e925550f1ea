//! In-memory localisation table: languages × keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::csv::CsvRows;
use crate::error::{LocalisationError, Result};

/// Language created automatically when an entry is added to a table with no
/// languages, so every entry always has at least one value slot.
pub const DEFAULT_LANGUAGE: &str = "English";

/// A language known to a localisation table.
///
/// Unique by `name` within a table; `code` is an optional ISO code used to
/// match against the host system locale and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// A single localisation key with one text value per language.
///
/// `values[i]` corresponds to the table's language at index `i`. An absent
/// translation is stored as an empty string, never treated as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalisationEntry {
    pub key: String,
    pub values: Vec<String>,
}

/// Table of localisation entries across an ordered set of languages.
///
/// Invariant: after every mutation, each entry's value count equals the
/// language count. Inserting or removing a language resizes every entry in
/// lockstep so index alignment is preserved; [`is_aligned`] lets tests
/// assert this directly.
///
/// [`is_aligned`]: LocalisationData::is_aligned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalisationData {
    languages: Vec<Language>,
    entries: HashMap<String, LocalisationEntry>,
}

impl LocalisationData {
    /// Create an empty table with no languages and no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Languages in table order.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Language names in table order.
    pub fn language_names(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }

    /// Index of a language by name, `None` if absent.
    pub fn language_index(&self, name: &str) -> Option<usize> {
        self.languages.iter().position(|l| l.name == name)
    }

    /// Whether a language with the given name exists.
    pub fn contains_language(&self, name: &str) -> bool {
        self.language_index(name).is_some()
    }

    /// Get-or-create a language by name.
    ///
    /// Idempotent: if the language already exists the existing one is
    /// returned and nothing changes. On a real insert, every existing entry
    /// grows an empty value slot for the new language.
    pub fn add_language(&mut self, name: &str, code: &str) -> &Language {
        if let Some(index) = self.language_index(name) {
            return &self.languages[index];
        }

        self.languages.push(Language {
            name: name.to_string(),
            code: code.to_string(),
        });
        for entry in self.entries.values_mut() {
            entry.values.push(String::new());
        }

        debug_assert!(self.is_aligned());
        &self.languages[self.languages.len() - 1]
    }

    /// Remove a language by name; a no-op if absent.
    ///
    /// Deletes the corresponding value slot from every entry, preserving the
    /// order of the remaining languages.
    pub fn remove_language(&mut self, name: &str) {
        let Some(index) = self.language_index(name) else {
            return;
        };
        self.languages.remove(index);
        for entry in self.entries.values_mut() {
            if index < entry.values.len() {
                entry.values.remove(index);
            }
        }
        debug_assert!(self.is_aligned());
    }

    /// Get-or-create an entry by key.
    ///
    /// The first entry added to a table with no languages creates
    /// [`DEFAULT_LANGUAGE`] so the entry has at least one value slot.
    pub fn add_entry(&mut self, key: &str) -> &mut LocalisationEntry {
        if self.languages.is_empty() {
            self.add_language(DEFAULT_LANGUAGE, "en");
        }
        let language_count = self.languages.len();
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| LocalisationEntry {
                key: key.to_string(),
                values: vec![String::new(); language_count],
            })
    }

    /// Look up an entry by key.
    pub fn entry(&self, key: &str) -> Option<&LocalisationEntry> {
        self.entries.get(key)
    }

    /// Whether an entry with the given key exists.
    pub fn contains_entry(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry by key; a no-op if absent.
    pub fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Remove all entries, leaving the languages in place.
    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }

    /// Number of entries in the table.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over all entries in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &LocalisationEntry> {
        self.entries.values()
    }

    /// Resolve the text for a key in a language, by language name.
    ///
    /// `None` strictly means "could not resolve" (key or language absent);
    /// an empty string is a valid stored value and is returned as such.
    pub fn get_text(&self, key: &str, language: &str) -> Option<&str> {
        let index = self.language_index(language)?;
        self.get_text_at(key, index)
    }

    /// Resolve the text for a key at a language index.
    pub fn get_text_at(&self, key: &str, language_index: usize) -> Option<&str> {
        self.entries
            .get(key)?
            .values
            .get(language_index)
            .map(String::as_str)
    }

    /// Store the text for a key in a language.
    ///
    /// Creates the entry if needed; returns `false` (and stores nothing)
    /// when the language is unknown.
    pub fn set_text(&mut self, key: &str, language: &str, value: &str) -> bool {
        let Some(index) = self.language_index(language) else {
            return false;
        };
        let entry = self.add_entry(key);
        if let Some(slot) = entry.values.get_mut(index) {
            *slot = value.to_string();
        }
        true
    }

    /// Merge another table into this one.
    ///
    /// Languages are unioned, then entries are unioned by key. For a key
    /// present in both tables, `other`'s values overwrite this table's
    /// values only for the languages `other` defines; values for languages
    /// absent from `other` are left untouched. Merge order is therefore
    /// significant: later merges win per (key, language) pair.
    pub fn merge(&mut self, other: &LocalisationData) {
        for language in &other.languages {
            self.add_language(&language.name, &language.code);
        }

        // Destination index for each of other's languages, in other's order.
        let indices: Vec<usize> = other
            .languages
            .iter()
            .filter_map(|l| self.language_index(&l.name))
            .collect();

        for entry in other.entries.values() {
            let dest = self.add_entry(&entry.key);
            for (source_index, &dest_index) in indices.iter().enumerate() {
                if let Some(value) = entry.values.get(source_index)
                    && let Some(slot) = dest.values.get_mut(dest_index)
                {
                    *slot = value.clone();
                }
            }
        }

        debug_assert!(self.is_aligned());
    }

    /// Whether every entry's value count matches the language count.
    pub fn is_aligned(&self) -> bool {
        let count = self.languages.len();
        self.entries.values().all(|e| e.values.len() == count)
    }

    /// Build a table from CSV text.
    ///
    /// Expected format: header row `Key,<Language1>,<Language2>,...`, then
    /// one row per key. Short rows are padded with empty values; surplus
    /// cells beyond the declared languages are ignored, so the alignment
    /// invariant holds for any input shape. A row whose key cell is empty
    /// is skipped.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut rows = CsvRows::new(text);
        let Some(header) = rows.next() else {
            return Err(LocalisationError::EmptyCsv);
        };
        if header.len() < 2 {
            return Err(LocalisationError::NoLanguages);
        }

        let mut data = Self::new();
        for name in header.iter().skip(1) {
            data.add_language(name, "");
        }
        let language_count = data.languages.len();

        for row in rows {
            let Some(key) = row.first() else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            let entry = data.add_entry(key);
            for index in 0..language_count {
                if let Some(value) = row.get(index + 1)
                    && let Some(slot) = entry.values.get_mut(index)
                {
                    value.clone_into(slot);
                }
            }
        }

        debug_assert!(data.is_aligned());
        Ok(data)
    }

    /// Write the table back out as CSV.
    ///
    /// Entries are emitted in sorted key order so output is deterministic.
    /// Fields containing a comma, quote, or newline are double-quoted with
    /// doubled-quote escaping.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("Key");
        for language in &self.languages {
            out.push(',');
            push_escaped(&mut out, &language.name);
        }
        out.push('\n');

        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        for key in keys {
            let Some(entry) = self.entries.get(key) else {
                continue;
            };
            push_escaped(&mut out, key);
            for value in &entry.values {
                out.push(',');
                push_escaped(&mut out, value);
            }
            out.push('\n');
        }
        out
    }
}

fn push_escaped(out: &mut String, field: &str) {
    if field.contains([',', '"', '\'', '\r', '\n']) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_language_is_idempotent() {
        let mut data = LocalisationData::new();
        data.add_language("English", "en");
        data.add_language("English", "en");
        assert_eq!(data.languages().len(), 1);
    }

    #[test]
    fn test_round_trip_text() {
        let mut data = LocalisationData::new();
        data.add_language("English", "en");
        data.add_entry("Key1").values[0] = "Hello".to_string();
        assert_eq!(data.get_text("Key1", "English"), Some("Hello"));
    }

    #[test]
    fn test_first_entry_creates_default_language() {
        let mut data = LocalisationData::new();
        data.add_entry("Key1");
        assert_eq!(data.language_names(), vec![DEFAULT_LANGUAGE]);
        assert!(data.is_aligned());
    }

    #[test]
    fn test_get_text_distinguishes_missing_from_empty() {
        let mut data = LocalisationData::new();
        data.add_language("English", "en");
        data.add_entry("Key1");
        assert_eq!(data.get_text("Key1", "English"), Some(""));
        assert_eq!(data.get_text("Missing", "English"), None);
        assert_eq!(data.get_text("Key1", "Klingon"), None);
    }

    #[test]
    fn test_new_language_resizes_entries() {
        let mut data = LocalisationData::new();
        data.add_language("English", "en");
        data.add_entry("Key1").values[0] = "Hello".to_string();
        data.add_language("French", "fr");
        assert!(data.is_aligned());
        assert_eq!(data.get_text("Key1", "English"), Some("Hello"));
        assert_eq!(data.get_text("Key1", "French"), Some(""));
    }

    #[test]
    fn test_remove_language_reindexes() {
        let mut data = LocalisationData::new();
        data.add_language("English", "en");
        data.add_language("French", "fr");
        data.add_language("Spanish", "es");
        let entry = data.add_entry("Key1");
        entry.values = vec!["e".to_string(), "f".to_string(), "s".to_string()];

        data.remove_language("French");

        assert!(data.is_aligned());
        assert_eq!(data.language_names(), vec!["English", "Spanish"]);
        assert_eq!(data.get_text("Key1", "English"), Some("e"));
        assert_eq!(data.get_text("Key1", "Spanish"), Some("s"));
    }

    #[test]
    fn test_remove_entry_is_idempotent() {
        let mut data = LocalisationData::new();
        data.add_entry("Key1");
        data.remove_entry("Key1");
        data.remove_entry("Key1");
        assert!(!data.contains_entry("Key1"));
    }

    #[test]
    fn test_alignment_after_mutation_sequence() {
        let mut data = LocalisationData::new();
        data.add_entry("a");
        data.add_language("French", "fr");
        data.add_entry("b");
        data.remove_language(DEFAULT_LANGUAGE);
        data.add_language("Spanish", "es");
        data.add_entry("c");
        data.remove_language("Spanish");
        assert!(data.is_aligned());
    }

    #[test]
    fn test_merge_overwrites_defined_languages_only() {
        let mut a = LocalisationData::new();
        a.add_language("English", "en");
        a.add_language("French", "fr");
        a.set_text("Key1", "English", "X");
        a.set_text("Key1", "French", "Bonjour");

        let mut b = LocalisationData::new();
        b.add_language("English", "en");
        b.set_text("Key1", "English", "Y");

        a.merge(&b);

        assert_eq!(a.get_text("Key1", "English"), Some("Y"));
        // b does not define French, so the French value survives.
        assert_eq!(a.get_text("Key1", "French"), Some("Bonjour"));
    }

    #[test]
    fn test_merge_unions_languages_and_keys() {
        let mut a = LocalisationData::new();
        a.add_language("English", "en");
        a.set_text("Key1", "English", "one");

        let mut b = LocalisationData::new();
        b.add_language("German", "de");
        b.set_text("Key2", "German", "zwei");

        a.merge(&b);

        assert!(a.is_aligned());
        assert_eq!(a.language_names(), vec!["English", "German"]);
        assert_eq!(a.get_text("Key1", "English"), Some("one"));
        assert_eq!(a.get_text("Key1", "German"), Some(""));
        assert_eq!(a.get_text("Key2", "German"), Some("zwei"));
    }

    #[test]
    fn test_from_csv_scenario() {
        let data = LocalisationData::from_csv("Key,English\nKey1,\"Value\"\"1\"\nKey2,Value2")
            .expect("CSV should parse");
        assert_eq!(data.language_names(), vec!["English"]);
        assert_eq!(data.get_text("Key1", "English"), Some("Value\"1"));
        assert_eq!(data.get_text("Key2", "English"), Some("Value2"));
    }

    #[test]
    fn test_from_csv_pads_short_rows() {
        let data =
            LocalisationData::from_csv("Key,English,French\nKey1,hello\n").expect("should parse");
        assert!(data.is_aligned());
        assert_eq!(data.get_text("Key1", "French"), Some(""));
    }

    #[test]
    fn test_from_csv_rejects_headerless_input() {
        assert!(matches!(
            LocalisationData::from_csv(""),
            Err(LocalisationError::EmptyCsv)
        ));
        assert!(matches!(
            LocalisationData::from_csv("Key\n"),
            Err(LocalisationError::NoLanguages)
        ));
    }

    #[test]
    fn test_csv_round_trip() {
        let mut data = LocalisationData::new();
        data.add_language("English", "en");
        data.set_text("Key1", "English", "a \"quoted\" value, with commas");
        data.set_text("Key2", "English", "line\nbreak");

        let reparsed = LocalisationData::from_csv(&data.to_csv()).expect("should parse");
        assert_eq!(
            reparsed.get_text("Key1", "English"),
            Some("a \"quoted\" value, with commas")
        );
        assert_eq!(reparsed.get_text("Key2", "English"), Some("line\nbreak"));
    }
}
