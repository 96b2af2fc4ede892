//! Core types for the flashcard generation pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One flashcard's raw JSON field bag, exactly as authored. Never mutated.
pub type Entry = Map<String, Value>;

/// Canonical semantic roles a JSON field can resolve to, independent of the
/// source field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRole {
    Target,
    Native,
    Example,
    ExampleTranslation,
    Pronunciation,
    Notes,
    Tags,
}

impl CanonicalRole {
    pub const ALL: [CanonicalRole; 7] = [
        Self::Target,
        Self::Native,
        Self::Example,
        Self::ExampleTranslation,
        Self::Pronunciation,
        Self::Notes,
        Self::Tags,
    ];

    /// Role name as used in field mappings and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Native => "native",
            Self::Example => "example",
            Self::ExampleTranslation => "example_translation",
            Self::Pronunciation => "pronunciation",
            Self::Notes => "notes",
            Self::Tags => "tags",
        }
    }
}

/// Context inherited while walking the document tree.
///
/// A child's metadata is a copy of the parent's, then extended or overridden;
/// siblings never share state. Always carries (possibly empty) values for
/// target_language, native_language, and content_type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub target_language: String,
    pub native_language: String,
    pub content_type: String,
    pub topic: String,
    pub level: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<u32>,
    pub unit_name: String,
    pub unit_topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<u32>,
    pub section_name: String,
    pub section_topic: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            target_language: String::new(),
            native_language: "english".to_string(),
            content_type: "vocabulary".to_string(),
            topic: String::new(),
            level: String::new(),
            source: String::new(),
            week: None,
            unit: None,
            unit_name: String::new(),
            unit_topic: String::new(),
            section: None,
            section_name: String::new(),
            section_topic: String::new(),
        }
    }
}

impl Metadata {
    /// Week number for tagging: explicit week, falling back to the unit
    /// number derived from the container key.
    pub fn week_number(&self) -> Option<u32> {
        self.week.or(self.unit)
    }

    /// Most specific topic available: section topic, then document topic.
    pub fn effective_topic(&self) -> &str {
        if !self.section_topic.is_empty() {
            &self.section_topic
        } else if !self.unit_topic.is_empty() {
            &self.unit_topic
        } else {
            &self.topic
        }
    }
}

/// A formatted flashcard, used only for preview and emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedCard {
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
    pub format_type: String,
}

/// Settings supplied by the (excluded) settings layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub target_language: String,
    pub native_language: String,
    pub show_connections: bool,
    pub html_formatting: bool,
    pub tag_prefix: String,
    pub required_fields: Vec<CanonicalRole>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            target_language: "Target".to_string(),
            native_language: "English".to_string(),
            show_connections: true,
            html_formatting: true,
            tag_prefix: "Language_Learning".to_string(),
            required_fields: vec![CanonicalRole::Target, CanonicalRole::Native],
        }
    }
}

/// Outcome of one export: where it went and how many rows made it.
///
/// Backs the "N of M entries exported" message in collaborating layers;
/// `failures` keeps the first few row-level failure reasons.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<String>,
}

impl ExportReport {
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// Leaf value rendered as display text.
///
/// Arrays join with ", " when longer than one element and unwrap when exactly
/// one; objects and nulls are treated as absent and render empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(leaf_text)
                .filter(|s| !s.is_empty())
                .collect();
            match parts.len() {
                0 => String::new(),
                1 => parts.into_iter().next().unwrap_or_default(),
                _ => parts.join(", "),
            }
        }
        Value::Object(_) | Value::Null => String::new(),
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
