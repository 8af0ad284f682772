// src/dialogue/mod.rs  —  Dialogue text localization (scene-local + global catalogs)
pub mod catalog;
pub mod localizer;
pub mod model;

pub use catalog::{DialogueCatalog, DialogueCatalogs, DialogueLocalizationRecord};
pub use localizer::localize;
pub use model::{DialogueChoice, DialogueNode, Namespace};
