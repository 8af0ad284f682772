// src/settings.rs  —  Key/value settings store (persisted language preference)
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// The one setting this crate reads and writes.
pub const LANGUAGE_SETTING_KEY: &str = "language";

/// Host-side preference storage.
pub trait SettingsStore: Send {
    fn get_string(&self, key: &str, default: &str) -> String;
    fn set_string(&mut self, key: &str, value: &str);
    /// Flush pending writes to durable storage.
    fn persist(&mut self) -> Result<()>;
}

// ── TOML file store ───────────────────────────────────────────────────────────
/// Flat string table stored as a TOML file.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path:   PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlSettingsStore {
    /// Open `path`. A missing file is an empty store; an unreadable or
    /// unparsable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = if path.exists() {
            match read_table(&path) {
                Ok(v)  => v,
                Err(e) => {
                    log::warn!("[settings] ignoring {}: {e:#}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { path, values }
    }
}

fn read_table(path: &Path) -> Result<BTreeMap<String, String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading settings {:?}", path))?;
    let table: toml::Table = toml::from_str(&raw)
        .with_context(|| format!("Parsing settings {:?}", path))?;
    // non-string values are not ours; drop them
    Ok(table.into_iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
        .collect())
}

impl SettingsStore for TomlSettingsStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn persist(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Creating settings directory {:?}", parent))?;
            }
        }
        let raw = toml::to_string(&self.values).context("Serializing settings")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Writing settings {:?}", self.path))?;
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────
/// Process-local store. Clones share the same table, so the host can keep a
/// handle after giving one to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values:   Arc<Mutex<BTreeMap<String, String>>>,
    persists: Arc<AtomicUsize>,
}

impl MemorySettingsStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.table().insert(key.to_string(), value.to_string());
        store
    }

    /// Number of `persist` calls so far.
    pub fn persist_count(&self) -> usize { self.persists.load(Ordering::SeqCst) }

    fn table(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.table().get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.table().insert(key.to_string(), value.to_string());
    }

    fn persist(&mut self) -> Result<()> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut store = TomlSettingsStore::open(&path);
        assert_eq!(store.get_string(LANGUAGE_SETTING_KEY, "English"), "English");
        store.set_string(LANGUAGE_SETTING_KEY, "Turkish");
        store.persist().unwrap();

        let reopened = TomlSettingsStore::open(&path);
        assert_eq!(reopened.get_string(LANGUAGE_SETTING_KEY, "English"), "Turkish");
    }

    #[test]
    fn toml_store_treats_garbage_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let store = TomlSettingsStore::open(&path);
        assert_eq!(store.get_string(LANGUAGE_SETTING_KEY, "English"), "English");
    }

    #[test]
    fn toml_store_ignores_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "language = \"Turkish\"\nvolume = 0.5\n").unwrap();
        let store = TomlSettingsStore::open(&path);
        assert_eq!(store.get_string("language", ""), "Turkish");
        assert_eq!(store.get_string("volume", "none"), "none");
    }

    #[test]
    fn memory_store_clones_share_state() {
        let handle = MemorySettingsStore::with_value(LANGUAGE_SETTING_KEY, "English");
        let mut engine_side = handle.clone();
        engine_side.set_string(LANGUAGE_SETTING_KEY, "Turkish");
        engine_side.persist().unwrap();
        assert_eq!(handle.get_string(LANGUAGE_SETTING_KEY, ""), "Turkish");
        assert_eq!(handle.persist_count(), 1);
    }
}
