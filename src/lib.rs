// src/lib.rs  —  loc-engine: runtime localization resolution
//
// Flat UI strings:  LocalizationCatalog  (active → any loaded → key)
// Dialogue text:    DialogueCatalogs + localize  (active → default → authored)
// Language changes fan out synchronously through SubscriberRegistry.
pub mod config;
pub mod dialogue;
pub mod i18n;
pub mod resources;
pub mod service;
pub mod settings;

pub use dialogue::{DialogueCatalog, DialogueCatalogs, DialogueChoice, DialogueLocalizationRecord, DialogueNode, Namespace};
pub use i18n::{LocalizationCatalog, Subscriber, SubscriberRegistry};
pub use resources::{DirResourceProvider, EmbeddedResourceProvider, ResourceProvider};
pub use service::Localization;
pub use settings::{MemorySettingsStore, SettingsStore, TomlSettingsStore, LANGUAGE_SETTING_KEY};
