// src/dialogue/catalog.rs  —  Dialogue id → language → localized text record
use super::model::Namespace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Localized text for one dialogue node in one language.
///
/// `choice_texts[i]` replaces the text of the node's i-th choice; the list
/// may be shorter than the node's choice list, and empty entries mean
/// "keep the original".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogueLocalizationRecord {
    pub display_name: String,
    pub body_text:    String,
    pub choice_texts: Vec<String>,
}

/// Authoring file layout: `{ "<dialogueId>": { "<language>": record } }`
type AuthoringFile = HashMap<String, HashMap<String, DialogueLocalizationRecord>>;

/// Localized records for one namespace.
#[derive(Debug, Clone, Default)]
pub struct DialogueCatalog {
    entries: HashMap<String, HashMap<String, DialogueLocalizationRecord>>,
}

impl DialogueCatalog {
    pub fn new() -> Self { Self::default() }

    /// Insert or overwrite the record for (`dialogue_id`, `language`).
    pub fn put(&mut self, dialogue_id: &str, language: &str, record: DialogueLocalizationRecord) {
        self.entries
            .entry(dialogue_id.to_string())
            .or_default()
            .insert(language.to_string(), record);
    }

    pub fn get(&self, dialogue_id: &str, language: &str) -> Option<&DialogueLocalizationRecord> {
        self.entries.get(dialogue_id)?.get(language)
    }

    /// Every language that appears for any dialogue id. Meant for
    /// language pickers; lookups do not consult it.
    pub fn available_languages(&self) -> BTreeSet<String> {
        self.entries.values()
            .flat_map(|by_lang| by_lang.keys().cloned())
            .collect()
    }

    pub fn languages_for(&self, dialogue_id: &str) -> BTreeSet<String> {
        self.entries.get(dialogue_id)
            .map(|by_lang| by_lang.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    /// Number of dialogue ids with at least one record.
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Merge authoring JSON into the catalog. Returns the number of records
    /// written, or an error if `raw` is not an authoring document.
    pub fn try_import_json(&mut self, raw: &str) -> Result<usize> {
        let file: AuthoringFile = serde_json::from_str(raw)
            .context("Parsing dialogue localization JSON")?;
        let mut n = 0;
        for (id, by_lang) in file {
            for (lang, record) in by_lang {
                self.put(&id, &lang, record);
                n += 1;
            }
        }
        Ok(n)
    }

    /// Like [`Self::try_import_json`], but malformed input only logs.
    pub fn import_json(&mut self, raw: &str) -> usize {
        match self.try_import_json(raw) {
            Ok(n)  => n,
            Err(e) => {
                log::warn!("[dialogue] import skipped: {e:#}");
                0
            }
        }
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading dialogue localization {:?}", path))?;
        self.try_import_json(&raw)
            .with_context(|| format!("Loading {:?}", path))
    }
}

/// The scene-local and global catalogs side by side.
#[derive(Debug, Clone, Default)]
pub struct DialogueCatalogs {
    pub scene:  DialogueCatalog,
    pub global: DialogueCatalog,
}

impl DialogueCatalogs {
    pub fn new() -> Self { Self::default() }

    pub fn for_namespace(&self, ns: Namespace) -> &DialogueCatalog {
        match ns {
            Namespace::Scene  => &self.scene,
            Namespace::Global => &self.global,
        }
    }

    pub fn for_namespace_mut(&mut self, ns: Namespace) -> &mut DialogueCatalog {
        match ns {
            Namespace::Scene  => &mut self.scene,
            Namespace::Global => &mut self.global,
        }
    }

    /// Scene change: scene-local records go, global ones stay.
    pub fn clear_scene(&mut self) { self.scene.clear(); }

    pub fn available_languages(&self) -> BTreeSet<String> {
        let mut langs = self.scene.available_languages();
        langs.extend(self.global.available_languages());
        langs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, body: &str, choices: &[&str]) -> DialogueLocalizationRecord {
        DialogueLocalizationRecord {
            display_name: name.into(),
            body_text:    body.into(),
            choice_texts: choices.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn put_then_get() {
        let mut c = DialogueCatalog::new();
        assert!(c.get("d1", "English").is_none());
        c.put("d1", "English", record("Mira", "Hello", &["Yes"]));
        assert_eq!(c.get("d1", "English").unwrap().body_text, "Hello");
        assert!(c.get("d1", "Turkish").is_none());
        assert!(c.get("d2", "English").is_none());
    }

    #[test]
    fn put_overwrites() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("Mira", "Hello", &[]));
        c.put("d1", "English", record("Mira", "Hi", &[]));
        assert_eq!(c.get("d1", "English").unwrap().body_text, "Hi");
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn available_languages_is_union_over_ids() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("", "a", &[]));
        c.put("d1", "Turkish", record("", "b", &[]));
        c.put("d2", "German", record("", "c", &[]));
        let langs: Vec<_> = c.available_languages().into_iter().collect();
        assert_eq!(langs, vec!["English", "German", "Turkish"]);
        assert_eq!(c.languages_for("d2").len(), 1);
        assert!(c.languages_for("d9").is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("", "a", &[]));
        c.clear();
        assert!(c.is_empty());
        assert!(c.available_languages().is_empty());
    }

    #[test]
    fn import_reads_authoring_layout() {
        let mut c = DialogueCatalog::new();
        let n = c.import_json(r#"{
            "gate_intro": {
                "English": { "displayName": "Mira", "bodyText": "The gate is shut.", "choiceTexts": ["Knock", "Leave"] },
                "Turkish": { "bodyText": "Kapı kapalı.", "comment": "ignored" }
            }
        }"#);
        assert_eq!(n, 2);
        let tr = c.get("gate_intro", "Turkish").unwrap();
        assert_eq!(tr.display_name, "");
        assert!(tr.choice_texts.is_empty());
        assert_eq!(c.get("gate_intro", "English").unwrap().choice_texts, vec!["Knock", "Leave"]);
    }

    #[test]
    fn malformed_import_changes_nothing() {
        let mut c = DialogueCatalog::new();
        assert_eq!(c.import_json("{ not json"), 0);
        assert!(c.try_import_json("[1, 2]").is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn load_file_reports_io_and_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("global_dialogue.json");
        std::fs::write(&good, r#"{"d1": {"English": {"bodyText": "Hi"}}}"#).unwrap();
        let bad = dir.path().join("broken.json");
        std::fs::write(&bad, "{").unwrap();

        let mut c = DialogueCatalog::new();
        assert_eq!(c.load_file(&good).unwrap(), 1);
        assert!(c.load_file(&bad).is_err());
        assert!(c.load_file(&dir.path().join("missing.json")).is_err());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn namespaces_are_independent() {
        let mut cs = DialogueCatalogs::new();
        cs.for_namespace_mut(Namespace::Scene).put("d1", "English", record("", "scene", &[]));
        cs.for_namespace_mut(Namespace::Global).put("d1", "Turkish", record("", "global", &[]));
        assert_eq!(cs.for_namespace(Namespace::Scene).get("d1", "English").unwrap().body_text, "scene");
        assert!(cs.for_namespace(Namespace::Global).get("d1", "English").is_none());
        assert_eq!(cs.available_languages().len(), 2);

        cs.clear_scene();
        assert!(cs.scene.is_empty());
        assert_eq!(cs.global.len(), 1);
    }
}
