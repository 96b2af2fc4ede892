//! Field resolution: mapping arbitrary JSON field names to canonical roles.
//!
//! Documents carry no fixed schema, so each canonical role resolves through a
//! ranked list of candidate field names. Language auto-detection builds a
//! per-document resolver with the detected language field promoted to rank 0
//! for the target role; a resolver is never shared across documents.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::{value_text, CanonicalRole, Entry};

/// Known languages and the field-name spellings they appear under.
/// Adding a language means appending a row here.
const LANGUAGE_TABLE: &[(&str, &[&str])] = &[
    ("german", &["german", "deutsch"]),
    ("english", &["english", "en"]),
    ("dutch", &["dutch", "nederlands"]),
    ("spanish", &["spanish", "español", "espanol"]),
    ("french", &["french", "français", "francais"]),
    ("italian", &["italian", "italiano"]),
    ("portuguese", &["portuguese", "português", "portugues"]),
    ("tagalog", &["tagalog"]),
];

fn base_aliases(role: CanonicalRole) -> &'static [&'static str] {
    match role {
        CanonicalRole::Target => &["target", "word", "term", "question"],
        CanonicalRole::Native => &["native", "english", "translation", "answer", "meaning"],
        CanonicalRole::Example => &["example", "examples", "example_sentence"],
        CanonicalRole::ExampleTranslation => &["example_translation", "translation_example"],
        CanonicalRole::Pronunciation => &["pronunciation", "phonetic", "sound"],
        CanonicalRole::Notes => &["notes", "note", "memory_tip", "tip"],
        CanonicalRole::Tags => &["tags", "tag"],
    }
}

/// Maps entry field names to canonical roles through ranked alias lists.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    aliases: HashMap<CanonicalRole, Vec<String>>,
    detected_language: Option<String>,
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldResolver {
    /// Resolver with the base alias table, no language overrides.
    pub fn new() -> Self {
        let aliases = CanonicalRole::ALL
            .iter()
            .map(|role| {
                let names = base_aliases(*role).iter().map(|s| s.to_string()).collect();
                (*role, names)
            })
            .collect();
        Self {
            aliases,
            detected_language: None,
        }
    }

    /// Build a fresh resolver for one document, with language fields detected
    /// from the entries' own keys promoted to rank 0.
    ///
    /// Always starts from the base table, so running detection on an already
    /// detected document produces the same resolver.
    pub fn for_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut resolver = Self::new();
        resolver.detect_languages(entries);
        resolver
    }

    /// Language detected for the target role, if any.
    pub fn detected_language(&self) -> Option<&str> {
        self.detected_language.as_deref()
    }

    /// Resolve a role against an entry's own keys, in alias rank order.
    ///
    /// Total: returns the first present non-empty value, or `""`. Arrays join
    /// with ", " (single elements unwrap); objects count as absent.
    pub fn resolve(&self, entry: &Entry, role: CanonicalRole) -> String {
        for alias in &self.aliases[&role] {
            if let Some(value) = entry.get(alias) {
                let text = value_text(value);
                if !text.is_empty() {
                    return text;
                }
            }
        }
        String::new()
    }

    /// Raw tag list for the tags role. A scalar tag value yields a one-element
    /// list; anything unresolvable yields an empty list.
    pub fn resolve_tag_list(&self, entry: &Entry) -> Vec<String> {
        for alias in &self.aliases[&CanonicalRole::Tags] {
            match entry.get(alias) {
                Some(Value::Array(items)) => {
                    let tags: Vec<String> = items
                        .iter()
                        .map(value_text)
                        .filter(|t| !t.is_empty())
                        .collect();
                    if !tags.is_empty() {
                        return tags;
                    }
                }
                Some(value) => {
                    let text = value_text(value);
                    if !text.is_empty() {
                        return vec![text];
                    }
                }
                None => {}
            }
        }
        Vec::new()
    }

    fn detect_languages<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        // Unique entry keys in first-seen order.
        let mut seen_keys: Vec<String> = Vec::new();
        for entry in entries {
            for key in entry.keys() {
                if !seen_keys.iter().any(|k| k == key) {
                    seen_keys.push(key.clone());
                }
            }
        }

        let mut non_english: Vec<(&str, String)> = Vec::new();
        let mut english_field: Option<String> = None;
        for key in &seen_keys {
            let lowered = key.to_lowercase();
            for (language, spellings) in LANGUAGE_TABLE {
                if spellings.contains(&lowered.as_str()) {
                    if *language == "english" {
                        if english_field.is_none() {
                            english_field = Some(key.clone());
                        }
                    } else if !non_english.iter().any(|(l, _)| l == language) {
                        non_english.push((language, key.clone()));
                    }
                }
            }
        }

        // Exactly one non-English language promotes the target role; the
        // native role is only promoted when an English-like key also exists.
        if let [(language, field)] = non_english.as_slice() {
            self.promote(CanonicalRole::Target, field);
            self.detected_language = Some(language.to_string());
            if let Some(english) = english_field {
                self.promote(CanonicalRole::Native, &english);
            }
        }
    }

    fn promote(&mut self, role: CanonicalRole, field: &str) {
        if let Some(names) = self.aliases.get_mut(&role) {
            names.retain(|n| n != field);
            names.insert(0, field.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn resolves_aliases_in_rank_order() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"word": "gehen", "target": "das Haus"}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Target), "das Haus");

        let e = entry(json!({"word": "gehen", "term": "ignored"}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Target), "gehen");
    }

    #[test]
    fn unresolved_role_yields_empty_string() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"unrelated": "x"}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Pronunciation), "");
    }

    #[test]
    fn empty_value_falls_through_to_next_alias() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"notes": "", "note": "plural: die Häuser"}));
        assert_eq!(
            resolver.resolve(&e, CanonicalRole::Notes),
            "plural: die Häuser"
        );
    }

    #[test]
    fn list_values_join_or_unwrap() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"example": ["Eins.", "Zwei."]}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Example), "Eins., Zwei.");

        let e = entry(json!({"example": ["Nur eins."]}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Example), "Nur eins.");
    }

    #[test]
    fn dict_values_count_as_absent() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"notes": {"nested": "x"}, "tip": "use the tip"}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Notes), "use the tip");
    }

    #[test]
    fn detection_promotes_language_field_over_target() {
        let e = entry(json!({"german": "Hallo", "target": "wrong"}));
        let resolver = FieldResolver::for_entries([&e]);
        assert_eq!(resolver.resolve(&e, CanonicalRole::Target), "Hallo");
        assert_eq!(resolver.detected_language(), Some("german"));
    }

    #[test]
    fn detection_promotes_english_for_native() {
        let e = entry(json!({"german": "Hallo", "english": "Hello", "native": "wrong"}));
        let resolver = FieldResolver::for_entries([&e]);
        assert_eq!(resolver.resolve(&e, CanonicalRole::Native), "Hello");
    }

    #[test]
    fn detection_is_idempotent() {
        let e = entry(json!({"german": "Hallo", "english": "Hello"}));
        let once = FieldResolver::for_entries([&e]);
        let mut twice = FieldResolver::for_entries([&e]);
        twice.detect_languages([&e]);
        assert_eq!(once.aliases, twice.aliases);
    }

    #[test]
    fn two_foreign_languages_disable_detection() {
        let a = entry(json!({"german": "Hallo"}));
        let b = entry(json!({"spanish": "hola"}));
        let resolver = FieldResolver::for_entries([&a, &b]);
        assert_eq!(resolver.detected_language(), None);
        // Base table untouched.
        let e = entry(json!({"german": "Hallo", "target": "right"}));
        assert_eq!(resolver.resolve(&e, CanonicalRole::Target), "right");
    }

    #[test]
    fn tag_list_handles_scalar_and_array() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"tags": ["a", "b"]}));
        assert_eq!(resolver.resolve_tag_list(&e), vec!["a", "b"]);

        let e = entry(json!({"tags": "solo"}));
        assert_eq!(resolver.resolve_tag_list(&e), vec!["solo"]);

        let e = entry(json!({"other": 1}));
        assert!(resolver.resolve_tag_list(&e).is_empty());
    }
}
