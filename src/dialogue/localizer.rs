// src/dialogue/localizer.rs  —  Original node + catalog → render-ready copy
use super::catalog::{DialogueCatalog, DialogueLocalizationRecord};
use super::model::{DialogueChoice, DialogueNode};
use std::borrow::Cow;

/// Produce the localized form of `node`.
///
/// Lookup order is the active language, then `default_language`, then the
/// node as authored. Unlike the flat catalog there is no fallback to an
/// unrelated third language.
///
/// Returns `Cow::Borrowed(node)` when nothing applies (no id, or no record),
/// otherwise a new node whose non-text fields are copied from the original.
pub fn localize<'a>(
    node: &'a DialogueNode,
    active_language: &str,
    default_language: &str,
    catalog: &DialogueCatalog,
) -> Cow<'a, DialogueNode> {
    let Some(id) = node.localization_id() else {
        return Cow::Borrowed(node);
    };
    let record = catalog.get(id, active_language).or_else(|| {
        if active_language == default_language {
            return None;
        }
        let r = catalog.get(id, default_language);
        if r.is_some() {
            log::debug!("[dialogue] {id}: no {active_language} record, using {default_language}");
        }
        r
    });
    match record {
        Some(r) => Cow::Owned(apply(node, r)),
        None => {
            log::debug!("[dialogue] {id}: no record, showing authored text");
            Cow::Borrowed(node)
        }
    }
}

fn apply(node: &DialogueNode, record: &DialogueLocalizationRecord) -> DialogueNode {
    let choices = node.choices.iter().enumerate()
        .map(|(i, choice)| DialogueChoice {
            text: pick(record.choice_texts.get(i).map(String::as_str), &choice.text),
            ..choice.clone()
        })
        .collect();
    DialogueNode {
        display_name: pick(Some(record.display_name.as_str()), &node.display_name),
        body_text:    pick(Some(record.body_text.as_str()), &node.body_text),
        choices,
        ..node.clone()
    }
}

/// Localized text if present and non-empty, else the original.
fn pick(localized: Option<&str>, original: &str) -> String {
    match localized {
        Some(s) if !s.is_empty() => s.to_string(),
        _                        => original.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::model::Namespace;
    use std::collections::BTreeMap;

    fn choice(text: &str, morale: i32, next: &str) -> DialogueChoice {
        DialogueChoice {
            text:        text.into(),
            stat_deltas: BTreeMap::from([("morale".to_string(), morale)]),
            next:        Some(next.into()),
        }
    }

    fn node() -> DialogueNode {
        DialogueNode {
            id:           Some("d1".into()),
            display_name: "Mira".into(),
            body_text:    "The gate is shut.".into(),
            images:       vec!["mira_neutral.png".into()],
            namespace:    Namespace::Global,
            choices:      vec![
                choice("Knock", 1, "d2"),
                choice("Wait", 0, "d3"),
                choice("Leave", -2, "d4"),
            ],
        }
    }

    fn record(name: &str, body: &str, choices: &[&str]) -> DialogueLocalizationRecord {
        DialogueLocalizationRecord {
            display_name: name.into(),
            body_text:    body.into(),
            choice_texts: choices.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn falls_back_to_default_language_record() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("Mira (EN)", "Gate shut.", &[]));
        let original = node();
        let out = localize(&original, "Turkish", "English", &c);
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(out.display_name, "Mira (EN)");
        assert_eq!(out.body_text, "Gate shut.");
    }

    #[test]
    fn no_record_anywhere_returns_original() {
        let c = DialogueCatalog::new();
        let original = node();
        let out = localize(&original, "Turkish", "English", &c);
        match out {
            Cow::Borrowed(n) => assert!(std::ptr::eq(n, &original)),
            Cow::Owned(_)    => panic!("expected the original node back"),
        }
    }

    #[test]
    fn never_falls_back_to_a_third_language() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "German", record("Mira (DE)", "Das Tor ist zu.", &[]));
        let original = node();
        assert!(matches!(localize(&original, "Turkish", "English", &c), Cow::Borrowed(_)));
    }

    #[test]
    fn active_language_wins_over_default() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("", "Gate shut.", &[]));
        c.put("d1", "Turkish", record("", "Kapı kapalı.", &[]));
        let original = node();
        assert_eq!(localize(&original, "Turkish", "English", &c).body_text, "Kapı kapalı.");
    }

    #[test]
    fn missing_id_is_never_looked_up() {
        let mut c = DialogueCatalog::new();
        c.put("", "English", record("x", "x", &[]));
        let mut original = node();
        original.id = None;
        assert!(matches!(localize(&original, "English", "English", &c), Cow::Borrowed(_)));
        original.id = Some(String::new());
        assert!(matches!(localize(&original, "English", "English", &c), Cow::Borrowed(_)));
    }

    #[test]
    fn choices_substitute_by_position() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "Turkish", record("", "", &["A", ""]));
        let original = node();
        let out = localize(&original, "Turkish", "English", &c);

        let texts: Vec<_> = out.choices.iter().map(|ch| ch.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "Wait", "Leave"]);
        for (loc, orig) in out.choices.iter().zip(&original.choices) {
            assert_eq!(loc.stat_deltas, orig.stat_deltas);
            assert_eq!(loc.next, orig.next);
        }
    }

    #[test]
    fn empty_record_fields_keep_original_text() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("", "", &[]));
        let original = node();
        let out = localize(&original, "English", "English", &c);
        assert_eq!(*out, original);
    }

    #[test]
    fn extra_choice_texts_do_not_add_choices() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "English", record("", "", &["1", "2", "3", "4", "5"]));
        let original = node();
        let out = localize(&original, "English", "English", &c);
        assert_eq!(out.choices.len(), 3);
        assert_eq!(out.choices[2].text, "3");
    }

    #[test]
    fn non_text_fields_are_copied_and_original_untouched() {
        let mut c = DialogueCatalog::new();
        c.put("d1", "Turkish", record("Mira", "Kapı kapalı.", &["Çal", "Bekle", "Git"]));
        let original = node();
        let before = original.clone();
        let out = localize(&original, "Turkish", "English", &c);
        assert_eq!(out.id, original.id);
        assert_eq!(out.images, original.images);
        assert_eq!(out.namespace, original.namespace);
        assert_eq!(original, before);
    }
}
