//! Language-change notification.

/// Event published when the active language changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChange {
    /// The language now active.
    pub new_language: String,
    /// The previously active language, `None` if this is the first
    /// assignment.
    pub old_language: Option<String>,
}

/// Fire-and-forget sink for language-change events.
///
/// The context publishes to every registered sink after the new language is
/// persisted; no return value is consulted.
pub trait LanguageSink {
    fn language_changed(&self, change: &LanguageChange);
}

impl<F> LanguageSink for F
where
    F: Fn(&LanguageChange),
{
    fn language_changed(&self, change: &LanguageChange) {
        self(change)
    }
}
