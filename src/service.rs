// src/service.rs  —  The localization service handed to every consumer
use crate::dialogue::{self, DialogueCatalogs, DialogueLocalizationRecord, DialogueNode, Namespace};
use crate::i18n::{LocalizationCatalog, Subscriber, SubscriberRegistry};
use crate::resources::ResourceProvider;
use crate::settings::SettingsStore;
use anyhow::Result;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One instance per process, built at startup and shared as
/// `Arc<Localization>`.
///
/// All writes go through `&self` methods that take the relevant lock; readers
/// get plain values or a scoped `&` view, never a mutable reference to the
/// internal tables.
pub struct Localization {
    catalog:     RwLock<LocalizationCatalog>,
    dialogue:    RwLock<DialogueCatalogs>,
    subscribers: SubscriberRegistry,
    settings:    Mutex<Box<dyn SettingsStore>>,
}

impl Localization {
    pub fn new(catalog: LocalizationCatalog, settings: Box<dyn SettingsStore>) -> Self {
        Self {
            catalog:     RwLock::new(catalog),
            dialogue:    RwLock::new(DialogueCatalogs::new()),
            subscribers: SubscriberRegistry::new(),
            settings:    Mutex::new(settings),
        }
    }

    /// Build the catalog from `provider`, then restore the persisted language.
    pub fn startup(
        default_language: &str,
        languages: &[String],
        provider: &dyn ResourceProvider,
        settings: Box<dyn SettingsStore>,
    ) -> Self {
        let mut catalog = LocalizationCatalog::new(default_language);
        let loaded = catalog.load_from(provider, languages);
        catalog.restore_language(settings.as_ref());
        log::info!(
            "[localization] {loaded}/{} languages loaded, active: {}",
            languages.len(), catalog.current_language()
        );
        Self::new(catalog, settings)
    }

    // ── Consumer surface ─────────────────────────────────────────────────────
    pub fn resolve(&self, key: &str) -> String {
        self.read_catalog().resolve(key).to_string()
    }

    /// Localize a dialogue node against the catalog for its namespace.
    pub fn localize<'a>(&self, node: &'a DialogueNode) -> Cow<'a, DialogueNode> {
        let (active, default) = {
            let c = self.read_catalog();
            (c.current_language().to_string(), c.default_language().to_string())
        };
        let dialogue = self.read_dialogue();
        dialogue::localize(node, &active, &default, dialogue.for_namespace(node.namespace))
    }

    /// Set, persist, then notify. The catalog lock is released before any
    /// subscriber runs, so `refresh` may call back into `resolve`.
    pub fn switch_language(&self, language: &str) -> bool {
        let changed = {
            let mut catalog = self.write_catalog();
            let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
            catalog.apply_language(language, settings.as_mut())
        };
        if changed {
            let n = self.subscribers.notify_all();
            log::debug!("[localization] now {language}, refreshed {n} subscriber(s)");
        }
        changed
    }

    pub fn current_language(&self) -> String {
        self.read_catalog().current_language().to_string()
    }

    /// Loaded UI languages plus every language with dialogue records.
    pub fn available_languages(&self) -> BTreeSet<String> {
        let mut langs: BTreeSet<String> =
            self.read_catalog().loaded_languages().map(str::to_string).collect();
        langs.extend(self.read_dialogue().available_languages());
        langs
    }

    pub fn subscribe<S: Subscriber + 'static>(&self, sub: &Arc<S>) -> bool {
        self.subscribers.register(sub)
    }

    pub fn unsubscribe<S: Subscriber + 'static>(&self, sub: &Arc<S>) -> bool {
        self.subscribers.unregister(sub)
    }

    pub fn subscribe_dyn(&self, sub: &Arc<dyn Subscriber>) -> bool {
        self.subscribers.register_dyn(sub)
    }

    pub fn unsubscribe_dyn(&self, sub: &Arc<dyn Subscriber>) -> bool {
        self.subscribers.unregister_dyn(sub)
    }

    pub fn subscriber_count(&self) -> usize { self.subscribers.len() }

    // ── Population ───────────────────────────────────────────────────────────
    pub fn load(&self, language: &str, raw: &str) -> usize {
        self.write_catalog().load(language, raw)
    }

    pub fn put_dialogue(&self, ns: Namespace, id: &str, language: &str, record: DialogueLocalizationRecord) {
        self.write_dialogue().for_namespace_mut(ns).put(id, language, record);
    }

    /// Merge authoring JSON into one namespace; malformed input only logs.
    pub fn import_dialogue(&self, ns: Namespace, raw: &str) -> usize {
        self.write_dialogue().for_namespace_mut(ns).import_json(raw)
    }

    /// Read an authoring file into one namespace.
    pub fn load_dialogue_file(&self, ns: Namespace, path: &Path) -> Result<usize> {
        self.write_dialogue().for_namespace_mut(ns).load_file(path)
    }

    pub fn clear_dialogue(&self, ns: Namespace) {
        self.write_dialogue().for_namespace_mut(ns).clear();
    }

    // ── Scoped read access ───────────────────────────────────────────────────
    /// `f` runs with the catalog read lock held. It must not call back into
    /// this service: `switch_language` or `load` from inside `f` deadlocks.
    pub fn with_catalog<R>(&self, f: impl FnOnce(&LocalizationCatalog) -> R) -> R {
        f(&self.read_catalog())
    }

    /// `f` runs with the dialogue read lock held; the same rule as
    /// [`Self::with_catalog`] applies to `put_dialogue` and friends.
    pub fn with_dialogue<R>(&self, f: impl FnOnce(&DialogueCatalogs) -> R) -> R {
        f(&self.read_dialogue())
    }

    fn read_catalog(&self) -> RwLockReadGuard<'_, LocalizationCatalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }
    fn write_catalog(&self) -> RwLockWriteGuard<'_, LocalizationCatalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
    fn read_dialogue(&self) -> RwLockReadGuard<'_, DialogueCatalogs> {
        self.dialogue.read().unwrap_or_else(PoisonError::into_inner)
    }
    fn write_dialogue(&self) -> RwLockWriteGuard<'_, DialogueCatalogs> {
        self.dialogue.write().unwrap_or_else(PoisonError::into_inner)
    }
}
