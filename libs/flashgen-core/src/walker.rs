//! Content tree walker: discovers entry collections at arbitrary depth.
//!
//! Documents have no fixed schema. Entries can sit in a flat collection at the
//! root (`entries`, `words`, `items`, `phrases`) or be nested under container
//! keys (`units`, `weeks`, `days`, ...), one or two levels deep. The walk is a
//! single deterministic pass in source declaration order, and each yielded
//! entry carries a metadata copy inherited from its ancestors.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::types::{value_text, Entry, Metadata};

/// Keys whose array values hold entry objects.
const COLLECTION_KEYS: [&str; 4] = ["entries", "words", "items", "phrases"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerLevel {
    Unit,
    Section,
}

/// Container keys in priority order. Only the first matching container type at
/// a given level is processed; sibling container types are ignored.
const CONTAINER_KEYS: [(&str, ContainerLevel); 6] = [
    ("units", ContainerLevel::Unit),
    ("weeks", ContainerLevel::Unit),
    ("days", ContainerLevel::Section),
    ("lessons", ContainerLevel::Section),
    ("sections", ContainerLevel::Section),
    ("chapters", ContainerLevel::Unit),
];

/// Walk a parsed document and yield every (entry, metadata) pair, in source
/// declaration order.
///
/// `base` supplies caller-provided context (e.g. a week number); the document's
/// own top-level fields are merged over it. A root that is not a JSON object
/// yields an empty sequence with a logged warning, never an error.
pub fn walk(document: &Value, base: Metadata) -> Vec<(Entry, Metadata)> {
    let Some(root) = document.as_object() else {
        warn!("document root is not an object, nothing to extract");
        return Vec::new();
    };

    let metadata = root_metadata(root, base);
    let mut pairs = Vec::new();

    if collect_entries(root, &metadata, &mut pairs) {
        return pairs;
    }

    let mut matched: Option<&str> = None;
    for (key, level) in CONTAINER_KEYS {
        let Some(container) = root.get(key).and_then(Value::as_object) else {
            continue;
        };
        if let Some(first) = matched {
            debug!(skipped = key, processed = first, "sibling container type ignored");
            continue;
        }
        matched = Some(key);

        for (child_key, child_value) in container {
            let Some(child) = child_value.as_object() else {
                continue;
            };
            let child_meta = merge_container(&metadata, level, child_key, child);
            collect_entries(child, &child_meta, &mut pairs);

            if level == ContainerLevel::Unit {
                walk_sections(child, &child_meta, &mut pairs);
            }
        }
    }

    pairs
}

/// Descend one level from a unit into its section containers.
fn walk_sections(unit: &Map<String, Value>, metadata: &Metadata, out: &mut Vec<(Entry, Metadata)>) {
    let mut matched: Option<&str> = None;
    for (key, level) in CONTAINER_KEYS {
        if level != ContainerLevel::Section {
            continue;
        }
        let Some(container) = unit.get(key).and_then(Value::as_object) else {
            continue;
        };
        if let Some(first) = matched {
            debug!(skipped = key, processed = first, "sibling container type ignored");
            continue;
        }
        matched = Some(key);

        for (section_key, section_value) in container {
            let Some(section) = section_value.as_object() else {
                continue;
            };
            let section_meta =
                merge_container(metadata, ContainerLevel::Section, section_key, section);
            collect_entries(section, &section_meta, out);
        }
    }
}

/// Append every object element of the node's first array-valued collection
/// key. Returns whether such a collection was found; missing or non-array
/// values mean "no entries here".
fn collect_entries(
    node: &Map<String, Value>,
    metadata: &Metadata,
    out: &mut Vec<(Entry, Metadata)>,
) -> bool {
    for key in COLLECTION_KEYS {
        let Some(items) = node.get(key).and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            match item.as_object() {
                Some(entry) => out.push((entry.clone(), metadata.clone())),
                None => debug!(collection = key, "skipping non-object element"),
            }
        }
        return true;
    }
    false
}

/// Merge the document's own top-level fields over caller-provided context.
fn root_metadata(root: &Map<String, Value>, base: Metadata) -> Metadata {
    let mut metadata = base;
    if let Some(language) = string_at(root, &["target_language", "language"]) {
        metadata.target_language = language;
    }
    if let Some(native) = string_at(root, &["native_language"]) {
        metadata.native_language = native;
    }
    if let Some(content_type) = string_at(root, &["content_type", "type"]) {
        metadata.content_type = content_type;
    }
    if let Some(topic) = string_at(root, &["topic", "title"]) {
        metadata.topic = topic;
    }
    if let Some(level) = string_at(root, &["level", "difficulty"]) {
        metadata.level = level;
    }
    if let Some(source) = string_at(root, &["source"]) {
        metadata.source = source;
    }
    metadata
}

/// Copy the parent metadata and merge one container child's context into it.
fn merge_container(
    parent: &Metadata,
    level: ContainerLevel,
    child_key: &str,
    child: &Map<String, Value>,
) -> Metadata {
    let mut metadata = parent.clone();
    let number = number_in_key(child_key);
    let topic = string_at(child, &["topic", "title"]).unwrap_or_default();
    match level {
        ContainerLevel::Unit => {
            metadata.unit = Some(number);
            metadata.unit_name = child_key.to_string();
            metadata.unit_topic = topic;
        }
        ContainerLevel::Section => {
            metadata.section = Some(number);
            metadata.section_name = child_key.to_string();
            metadata.section_topic = topic;
        }
    }
    metadata
}

/// First non-empty scalar value among the given keys.
fn string_at(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.get(*key) {
            let text = value_text(value);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Number derived from a container key: the first run of ASCII digits
/// (`"week_12"` -> 12, `"day3"` -> 3), defaulting to 1. A run too large for
/// `u32` saturates instead of falling back to the default.
fn number_in_key(key: &str) -> u32 {
    let digits: String = key
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 1;
    }
    digits.parse().unwrap_or(u32::MAX)
}
