// src/resources.rs  —  Where raw localization text comes from
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Supplies the raw, unparsed resource text for a language.
/// `None` means the resource could not be obtained.
pub trait ResourceProvider {
    fn raw_text(&self, language: &str) -> Option<String>;
}

/// Resource name for a language, e.g. `English_localization`.
pub fn resource_name(language: &str) -> String {
    format!("{language}_localization")
}

/// Extensions tried in order by [`DirResourceProvider`].
const EXTENSIONS: &[&str] = &["json", "txt"];

// ── Directory provider ────────────────────────────────────────────────────────
/// Reads `<dir>/<language>_localization.json`, then `.txt`.
#[derive(Debug, Clone)]
pub struct DirResourceProvider {
    dir: PathBuf,
}

impl DirResourceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    fn read(&self, language: &str) -> Result<Option<String>> {
        let name = resource_name(language);
        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{name}.{ext}"));
            if path.is_file() {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Reading resource {:?}", path))?;
                return Ok(Some(raw));
            }
        }
        Ok(None)
    }
}

impl ResourceProvider for DirResourceProvider {
    fn raw_text(&self, language: &str) -> Option<String> {
        match self.read(language) {
            Ok(Some(raw)) => Some(raw),
            Ok(None) => {
                log::debug!("[resources] no {} in {}", resource_name(language), self.dir.display());
                None
            }
            Err(e) => {
                log::warn!("[resources] {e:#}");
                None
            }
        }
    }
}

// ── Embedded provider ─────────────────────────────────────────────────────────
/// Resources compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedResourceProvider;

#[cfg(feature = "embedded")]
static EMBEDDED: &[(&str, &str)] = &[
    ("English", include_str!("../resources/English_localization.json")),
    ("Turkish", include_str!("../resources/Turkish_localization.json")),
];
#[cfg(not(feature = "embedded"))]
static EMBEDDED: &[(&str, &str)] = &[];

impl EmbeddedResourceProvider {
    /// Languages with a built-in resource.
    pub fn languages() -> Vec<String> {
        EMBEDDED.iter().map(|(lang, _)| lang.to_string()).collect()
    }
}

impl ResourceProvider for EmbeddedResourceProvider {
    fn raw_text(&self, language: &str) -> Option<String> {
        EMBEDDED.iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, raw)| raw.to_string())
    }
}

// ── In-memory maps ────────────────────────────────────────────────────────────
/// language → raw text, for hosts that already hold the content.
impl ResourceProvider for HashMap<String, String> {
    fn raw_text(&self, language: &str) -> Option<String> {
        self.get(language).cloned()
    }
}
