// src/dialogue/model.rs  —  Dialogue-graph node shapes (read, copied, never mutated)
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which dialogue catalog an id belongs to. Ids are unique per namespace only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    #[default]
    Scene,
    Global,
}

/// One selectable answer. Everything except `text` is gameplay data owned by
/// the dialogue graph and passes through localization untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogueChoice {
    pub text:        String,
    /// Stat name → delta applied when the choice is taken
    pub stat_deltas: BTreeMap<String, i32>,
    /// Id of the node this choice leads to
    pub next:        Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogueNode {
    /// `None` or empty marks content with nothing to translate
    pub id:           Option<String>,
    pub display_name: String,
    pub body_text:    String,
    pub images:       Vec<String>,
    pub namespace:    Namespace,
    pub choices:      Vec<DialogueChoice>,
}

impl DialogueNode {
    /// The id, if present and non-empty.
    pub fn localization_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}
