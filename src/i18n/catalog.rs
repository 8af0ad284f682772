// src/i18n/catalog.rs  —  Per-language flat string tables + active language
use super::parser::{self, StringTable};
use super::subscribers::SubscriberRegistry;
use crate::resources::ResourceProvider;
use crate::settings::{SettingsStore, LANGUAGE_SETTING_KEY};
use std::collections::BTreeMap;

/// Flat UI string catalog.
///
/// Lookups never fail: a key missing from the active language is taken
/// from any other loaded language, and failing that the key itself is
/// returned so missing translations stay visible on screen.
#[derive(Debug, Clone)]
pub struct LocalizationCatalog {
    active:      String,
    default:     String,
    // BTreeMap keeps the cross-language fallback scan in a stable order
    by_language: BTreeMap<String, StringTable>,
}

impl LocalizationCatalog {
    /// Empty catalog; the active language starts at `default_language`.
    pub fn new(default_language: &str) -> Self {
        Self {
            active:      default_language.to_string(),
            default:     default_language.to_string(),
            by_language: BTreeMap::new(),
        }
    }

    /// Parse `raw` and install it as the table for `language`, replacing any
    /// earlier one. An empty parse still installs an (empty) table.
    /// Returns the number of entries installed.
    pub fn load(&mut self, language: &str, raw: &str) -> usize {
        let table = parser::parse(raw);
        let n = table.len();
        if n == 0 {
            log::warn!("[catalog] {language}: resource parsed to zero entries");
        } else {
            log::debug!("[catalog] {language}: {n} entries");
        }
        self.by_language.insert(language.to_string(), table);
        n
    }

    /// Load every language `provider` can supply. Languages whose resource
    /// is missing are logged and left unloaded.
    /// Returns the number of languages loaded.
    pub fn load_from(&mut self, provider: &dyn ResourceProvider, languages: &[String]) -> usize {
        let mut loaded = 0;
        for lang in languages {
            match provider.raw_text(lang) {
                Some(raw) => { self.load(lang, &raw); loaded += 1; }
                None      => log::warn!("[catalog] {lang}: resource missing, language not loaded"),
            }
        }
        loaded
    }

    /// Add or overwrite a single entry (authoring tools).
    pub fn insert(&mut self, language: &str, key: &str, value: &str) {
        self.by_language
            .entry(language.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Text for `key`: active language, then any loaded language, then `key`.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        if key.is_empty() {
            return key;
        }
        if let Some(v) = self.get(&self.active, key) {
            return v;
        }
        self.by_language.iter()
            .filter(|(lang, _)| **lang != self.active)
            .find_map(|(_, table)| table.get(key).map(String::as_str))
            .unwrap_or(key)
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, language: &str, key: &str) -> Option<&str> {
        self.by_language.get(language)?.get(key).map(String::as_str)
    }

    /// Switch the active language, persist it and notify every subscriber.
    /// No-op when `language` is already active. Returns whether it changed.
    ///
    /// Subscribers here cannot read back into this catalog while it is
    /// mutably borrowed; [`crate::Localization`] releases its lock first.
    pub fn switch_language(
        &mut self,
        language: &str,
        settings: &mut dyn SettingsStore,
        subscribers: &SubscriberRegistry,
    ) -> bool {
        if !self.apply_language(language, settings) {
            return false;
        }
        subscribers.notify_all();
        true
    }

    /// The mutation half of a switch: set, then persist. No notification.
    pub(crate) fn apply_language(&mut self, language: &str, settings: &mut dyn SettingsStore) -> bool {
        if language == self.active {
            return false;
        }
        if !self.is_loaded(language) {
            log::debug!("[catalog] switching to {language}, which has no loaded table");
        }
        log::debug!("[catalog] language {} → {}", self.active, language);
        self.active = language.to_string();
        settings.set_string(LANGUAGE_SETTING_KEY, language);
        if let Err(e) = settings.persist() {
            log::warn!("[catalog] could not persist language preference: {e:#}");
        }
        true
    }

    /// Startup: adopt the persisted language without persisting or notifying.
    pub fn restore_language(&mut self, settings: &dyn SettingsStore) {
        let lang = settings.get_string(LANGUAGE_SETTING_KEY, &self.default);
        if !lang.is_empty() {
            self.active = lang;
        }
    }

    pub fn current_language(&self) -> &str { &self.active }
    pub fn default_language(&self) -> &str { &self.default }

    /// Loaded languages in fallback-scan order.
    pub fn loaded_languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }

    /// True once a table has been installed, even an empty one.
    pub fn is_loaded(&self, language: &str) -> bool {
        self.by_language.contains_key(language)
    }

    /// Entries for one language.
    pub fn len(&self, language: &str) -> usize {
        self.by_language.get(language).map_or(0, |t| t.len())
    }
}
