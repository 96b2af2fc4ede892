//! Card formatters for the supported export dialects.
//!
//! One closed format set dispatched through a single type; tag synthesis and
//! HTML wrapping are shared functions rather than an inheritance chain. Every
//! formatter resolves entry fields through a [`FieldResolver`] and is total:
//! missing optional fields are omitted from the output, never an error. A row
//! may be degraded (front `"Unknown"`) but is never dropped here; dropping and
//! counting is the emitter's job.

use std::collections::HashMap;

use serde_json::Value;

use crate::resolver::FieldResolver;
use crate::types::{
    value_text, CanonicalRole, Entry, FormattedCard, GeneratorSettings, Metadata,
};

/// Flag emoji for the inline connection hint, keyed by language name.
const LANGUAGE_FLAGS: &[(&str, &str)] = &[
    ("german", "🇩🇪"),
    ("english", "🇬🇧"),
    ("dutch", "🇳🇱"),
    ("spanish", "🇪🇸"),
    ("french", "🇫🇷"),
    ("italian", "🇮🇹"),
    ("portuguese", "🇵🇹"),
    ("tagalog", "🇵🇭"),
];

/// Export dialect. Closed set; `Generic` carries its own column layout.
#[derive(Debug, Clone, PartialEq)]
pub enum CardFormat {
    AnkiApp,
    Phrases,
    Anki,
    Quizlet,
    Generic {
        headers: Vec<String>,
        /// Lower-cased header -> entry field name.
        mapping: HashMap<String, String>,
    },
}

impl CardFormat {
    /// Dialect identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnkiApp => "ankiapp",
            Self::Phrases => "phrases",
            Self::Anki => "anki",
            Self::Quizlet => "quizlet",
            Self::Generic { .. } => "generic",
        }
    }

    /// Parse a dialect name. Unknown names yield `None`; callers wanting the
    /// original forgiving behavior fall back to [`CardFormat::generic_default`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ankiapp" => Some(Self::AnkiApp),
            "phrases" => Some(Self::Phrases),
            "anki" => Some(Self::Anki),
            "quizlet" => Some(Self::Quizlet),
            "generic" => Some(Self::generic_default()),
            _ => None,
        }
    }

    /// Two-column generic layout mapping Term/Definition onto target/native.
    pub fn generic_default() -> Self {
        let mapping = [("term", "target"), ("definition", "native")]
            .into_iter()
            .map(|(h, f)| (h.to_string(), f.to_string()))
            .collect();
        Self::Generic {
            headers: vec!["Term".to_string(), "Definition".to_string()],
            mapping,
        }
    }
}

/// Formats (entry, metadata) pairs into CSV rows for one dialect.
pub struct CardFormatter {
    format: CardFormat,
    settings: GeneratorSettings,
    resolver: FieldResolver,
}

impl CardFormatter {
    pub fn new(format: CardFormat, settings: GeneratorSettings) -> Self {
        Self::with_resolver(format, settings, FieldResolver::new())
    }

    /// Formatter using a per-document resolver (language detection applied).
    pub fn with_resolver(
        format: CardFormat,
        settings: GeneratorSettings,
        resolver: FieldResolver,
    ) -> Self {
        Self {
            format,
            settings,
            resolver,
        }
    }

    pub fn format(&self) -> &CardFormat {
        &self.format
    }

    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    /// Roles an entry must resolve for [`CardFormatter::validate_entry`].
    pub fn required_roles(&self) -> &[CanonicalRole] {
        &self.settings.required_fields
    }

    /// Column names for this dialect; row length always equals this length.
    /// Export files carry entries only, so these serve the preview and
    /// editing views.
    pub fn headers(&self) -> Vec<String> {
        match &self.format {
            CardFormat::AnkiApp | CardFormat::Phrases => {
                ["Front", "Back", "Tag", "", ""].map(String::from).to_vec()
            }
            CardFormat::Anki => ["Front", "Back", "Tags"].map(String::from).to_vec(),
            CardFormat::Quizlet => ["Term", "Definition"].map(String::from).to_vec(),
            CardFormat::Generic { headers, .. } => headers.clone(),
        }
    }

    /// True iff every required role resolves non-empty.
    pub fn validate_entry(&self, entry: &Entry) -> bool {
        self.settings
            .required_fields
            .iter()
            .all(|role| !self.resolver.resolve(entry, *role).is_empty())
    }

    /// Format one entry as a CSV row. Total over any entry; row length equals
    /// `headers().len()`.
    pub fn format_entry(&self, entry: &Entry, metadata: &Metadata) -> Vec<String> {
        match &self.format {
            CardFormat::AnkiApp => self.ankiapp_row(entry, metadata, false),
            CardFormat::Phrases => self.ankiapp_row(entry, metadata, true),
            CardFormat::Anki => self.anki_row(entry, metadata),
            CardFormat::Quizlet => self.quizlet_row(entry),
            CardFormat::Generic { headers, mapping } => {
                Self::generic_row(entry, headers, mapping)
            }
        }
    }

    /// Formatted card for display in preview panes; richer back than the
    /// export row (connections line, example translation).
    pub fn preview(&self, entry: &Entry, metadata: &Metadata) -> FormattedCard {
        let front = self.front(entry);
        let back = self.preview_back(entry);
        let tags = synthesize_tags(entry, metadata, &self.resolver);
        FormattedCard {
            front,
            back,
            tags,
            format_type: self.format.as_str().to_string(),
        }
    }

    /// Plain-text rendering of [`CardFormatter::preview`].
    pub fn preview_text(&self, entry: &Entry, metadata: &Metadata) -> String {
        let card = self.preview(entry, metadata);
        format!(
            "Front: {}\n\nBack: {}\n\nTags: {}",
            card.front,
            card.back,
            card.tags.join(",")
        )
    }

    fn front(&self, entry: &Entry) -> String {
        let front = self.resolver.resolve(entry, CanonicalRole::Target);
        if front.is_empty() {
            "Unknown".to_string()
        } else {
            front
        }
    }

    fn ankiapp_row(&self, entry: &Entry, metadata: &Metadata, phrases: bool) -> Vec<String> {
        let back = if phrases {
            self.phrases_back(entry, metadata)
        } else {
            self.clean_back(entry)
        };
        let tags = synthesize_tags(entry, metadata, &self.resolver).join(",");
        vec![self.front(entry), back, tags, String::new(), String::new()]
    }

    /// AnkiApp back: native (+ inline connection), then italic example,
    /// pronunciation, and note blocks. Missing pieces are omitted, relative
    /// order preserved.
    fn clean_back(&self, entry: &Entry) -> String {
        let html = self.settings.html_formatting;
        let mut parts = Vec::new();

        let native = self.resolver.resolve(entry, CanonicalRole::Native);
        if !native.is_empty() {
            let mut main = native;
            if self.settings.show_connections {
                if let Some((language, word)) = first_connection(entry) {
                    main.push_str(&format!(" ({})", connection_text(&language, &word)));
                }
            }
            parts.push(main);
        }

        let example = self.resolver.resolve(entry, CanonicalRole::Example);
        if !example.is_empty() {
            parts.push(italic(&format!("Example: {example}"), html));
        }

        let pronunciation = self.resolver.resolve(entry, CanonicalRole::Pronunciation);
        if !pronunciation.is_empty() {
            parts.push(italic(&format!("🔊 Pronunciation: {pronunciation}"), html));
        }

        let notes = self.resolver.resolve(entry, CanonicalRole::Notes);
        if !notes.is_empty() {
            parts.push(italic(&format!("📝 Note: {notes}"), html));
        }

        parts.join(paragraph_break(html))
    }

    /// Phrases back: category glyph + native, then Context and Level lines.
    fn phrases_back(&self, entry: &Entry, metadata: &Metadata) -> String {
        let html = self.settings.html_formatting;
        let mut lines = Vec::new();

        let native = self.resolver.resolve(entry, CanonicalRole::Native);
        let glyph = category_glyph(metadata.effective_topic(), &metadata.content_type);
        if native.is_empty() {
            lines.push(glyph.to_string());
        } else {
            lines.push(format!("{glyph} {native}"));
        }

        let topic = metadata.effective_topic();
        if !topic.is_empty() {
            lines.push(format!("Context: {topic}"));
        }

        if let Some(week) = metadata.week_number() {
            let language = if metadata.target_language.is_empty() {
                &self.settings.target_language
            } else {
                &metadata.target_language
            };
            lines.push(format!("Level: {} Week {}", capitalize(language), week));
        }

        lines.join(line_break(html))
    }

    fn anki_row(&self, entry: &Entry, metadata: &Metadata) -> Vec<String> {
        let html = self.settings.html_formatting;
        let front = self.resolver.resolve(entry, CanonicalRole::Target);

        let mut parts = Vec::new();
        let native = self.resolver.resolve(entry, CanonicalRole::Native);
        if !native.is_empty() {
            parts.push(bold(&native, html));
        }
        let example = self.resolver.resolve(entry, CanonicalRole::Example);
        if !example.is_empty() {
            parts.push(format!("{} {example}", bold("Example:", html)));
        }
        let back = parts.join(line_break(html));

        let tags = synthesize_tags(entry, metadata, &self.resolver).join(" ");
        vec![front, back, tags]
    }

    fn quizlet_row(&self, entry: &Entry) -> Vec<String> {
        let term = self.resolver.resolve(entry, CanonicalRole::Target);

        let mut parts = Vec::new();
        let native = self.resolver.resolve(entry, CanonicalRole::Native);
        if !native.is_empty() {
            parts.push(native);
        }
        let example = self.resolver.resolve(entry, CanonicalRole::Example);
        if !example.is_empty() {
            parts.push(format!("Example: {example}"));
            let translation = self
                .resolver
                .resolve(entry, CanonicalRole::ExampleTranslation);
            if !translation.is_empty() {
                parts.push(format!("({translation})"));
            }
        }

        vec![term, parts.join(" | ")]
    }

    fn generic_row(
        entry: &Entry,
        headers: &[String],
        mapping: &HashMap<String, String>,
    ) -> Vec<String> {
        headers
            .iter()
            .map(|header| {
                let lowered = header.to_lowercase();
                let field = mapping.get(&lowered).unwrap_or(&lowered);
                entry.get(field).map(value_text).unwrap_or_default()
            })
            .collect()
    }

    fn preview_back(&self, entry: &Entry) -> String {
        let html = self.settings.html_formatting;
        let mut parts = Vec::new();

        let native = self.resolver.resolve(entry, CanonicalRole::Native);
        if !native.is_empty() {
            parts.push(bold(&native, html));
        }

        if self.settings.show_connections {
            if let Some(Value::Object(connections)) = entry.get("connections") {
                let hints: Vec<String> = connections
                    .iter()
                    .filter_map(|(language, word)| {
                        let text = value_text(word);
                        if text.is_empty() {
                            None
                        } else {
                            Some(format!("{}: {}", capitalize(language), italic(&text, html)))
                        }
                    })
                    .collect();
                if !hints.is_empty() {
                    parts.push(format!("🔗 {}", hints.join(" | ")));
                }
            }
        }

        let example = self.resolver.resolve(entry, CanonicalRole::Example);
        if !example.is_empty() {
            parts.push(format!("{} {example}", bold("Example:", html)));
            let translation = self
                .resolver
                .resolve(entry, CanonicalRole::ExampleTranslation);
            if !translation.is_empty() {
                parts.push(format!("{} {translation}", italic("Translation:", html)));
            }
        }

        let pronunciation = self.resolver.resolve(entry, CanonicalRole::Pronunciation);
        if !pronunciation.is_empty() {
            parts.push(format!("🔊 {}", italic(&pronunciation, html)));
        }

        let notes = self.resolver.resolve(entry, CanonicalRole::Notes);
        if !notes.is_empty() {
            parts.push(format!("📝 {notes}"));
        }

        parts.join(paragraph_break(html))
    }
}

/// Build the ordered, de-duplicated tag list shared by the dialects:
/// `Week{N}`, cleaned topic token, non-default content type, then up to two
/// entry tags.
pub fn synthesize_tags(entry: &Entry, metadata: &Metadata, resolver: &FieldResolver) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    if let Some(week) = metadata.week_number() {
        tags.push(format!("Week{week}"));
    }

    let topic = clean_topic(metadata.effective_topic());
    if !topic.is_empty() && !tags.contains(&topic) {
        tags.push(topic);
    }

    let content_type = entry
        .get("content_type")
        .or_else(|| entry.get("type"))
        .map(value_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| metadata.content_type.clone());
    if !content_type.is_empty() && content_type.to_lowercase() != "vocabulary" {
        let label = capitalize(&content_type);
        if !tags.contains(&label) {
            tags.push(label);
        }
    }

    for tag in resolver.resolve_tag_list(entry).into_iter().take(2) {
        let cleaned = capitalize(tag.trim());
        if !cleaned.is_empty() && !tags.contains(&cleaned) {
            tags.push(cleaned);
        }
    }

    tags
}

/// Reduce a topic to one tag token: first comma segment, `&` spelled out,
/// `"X and Y"` collapsed to `"X"`, first word, capitalized.
fn clean_topic(topic: &str) -> String {
    let first_segment = topic.split(',').next().unwrap_or("");
    let simplified = first_segment.replace('&', "and").replace(" and ", " ");
    let token = simplified.split_whitespace().next().unwrap_or("");
    capitalize(token)
}

/// First char uppercase, rest lowercase.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn italic(text: &str, html: bool) -> String {
    if html {
        format!("<i>{text}</i>")
    } else {
        format!("*{text}*")
    }
}

fn bold(text: &str, html: bool) -> String {
    if html {
        format!("<b>{text}</b>")
    } else {
        format!("**{text}**")
    }
}

fn line_break(html: bool) -> &'static str {
    if html {
        "<br>"
    } else {
        "\n"
    }
}

fn paragraph_break(html: bool) -> &'static str {
    if html {
        "<br><br>"
    } else {
        "\n\n"
    }
}

/// Inline secondary-language hint: a scalar `*_connection` field wins, else
/// the first pair of the `connections` object in declaration order.
fn first_connection(entry: &Entry) -> Option<(String, String)> {
    for (key, value) in entry {
        if let Some(language) = key.strip_suffix("_connection") {
            let text = value_text(value);
            if !text.is_empty() {
                return Some((language.to_string(), text));
            }
        }
    }

    if let Some(Value::Object(connections)) = entry.get("connections") {
        for (language, word) in connections {
            let text = value_text(word);
            if !text.is_empty() {
                return Some((language.clone(), text));
            }
        }
    }

    None
}

fn connection_text(language: &str, word: &str) -> String {
    let lowered = language.to_lowercase();
    let flag = LANGUAGE_FLAGS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, flag)| *flag);
    match flag {
        Some(flag) => format!("{flag} {}: {word}", capitalize(language)),
        None => format!("{}: {word}", capitalize(language)),
    }
}

/// Glyph for the Phrases dialect lead line, keyed on topic keywords.
fn category_glyph(topic: &str, content_type: &str) -> &'static str {
    let haystack = format!("{} {}", topic.to_lowercase(), content_type.to_lowercase());
    const GLYPHS: &[(&str, &str)] = &[
        ("greeting", "👋"),
        ("food", "🍽️"),
        ("drink", "🍽️"),
        ("travel", "✈️"),
        ("direction", "✈️"),
        ("shopping", "🛒"),
        ("time", "🕐"),
        ("number", "🔢"),
    ];
    for (keyword, glyph) in GLYPHS {
        if haystack.contains(keyword) {
            return glyph;
        }
    }
    "💬"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> Entry {
        value.as_object().unwrap().clone()
    }

    fn formatter(format: CardFormat) -> CardFormatter {
        CardFormatter::new(format, GeneratorSettings::default())
    }

    #[test]
    fn ankiapp_minimal_entry() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({"target": "das Haus", "native": "the house"}));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row, vec!["das Haus", "the house", "", "", ""]);
    }

    #[test]
    fn ankiapp_back_orders_optional_pieces() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "example": "Das Haus ist groß.",
            "pronunciation": "dahs hows",
            "notes": "Neuter noun"
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(
            row[1],
            "the house<br><br>\
             <i>Example: Das Haus ist groß.</i><br><br>\
             <i>🔊 Pronunciation: dahs hows</i><br><br>\
             <i>📝 Note: Neuter noun</i>"
        );
    }

    #[test]
    fn ankiapp_back_omits_missing_pieces_preserving_order() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({
            "target": "gehen",
            "native": "to go",
            "notes": "irregular"
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row[1], "to go<br><br><i>📝 Note: irregular</i>");
    }

    #[test]
    fn ankiapp_inline_connection_from_connections_object() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "connections": {"dutch": "het huis", "spanish": "la casa"}
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row[1], "the house (🇳🇱 Dutch: het huis)");
    }

    #[test]
    fn ankiapp_scalar_connection_field_wins() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "dutch_connection": "het huis",
            "connections": {"spanish": "la casa"}
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row[1], "the house (🇳🇱 Dutch: het huis)");
    }

    #[test]
    fn connections_hidden_when_disabled() {
        let settings = GeneratorSettings {
            show_connections: false,
            ..GeneratorSettings::default()
        };
        let f = CardFormatter::new(CardFormat::AnkiApp, settings);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "connections": {"dutch": "het huis"}
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row[1], "the house");
    }

    #[test]
    fn plain_text_mode_uses_asterisks_and_blank_lines() {
        let settings = GeneratorSettings {
            html_formatting: false,
            ..GeneratorSettings::default()
        };
        let f = CardFormatter::new(CardFormat::AnkiApp, settings);
        let e = entry(json!({
            "target": "gehen",
            "native": "to go",
            "example": "Ich gehe."
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row[1], "to go\n\n*Example: Ich gehe.*");
    }

    #[test]
    fn missing_target_degrades_to_unknown() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({"native": "the house"}));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row[0], "Unknown");
        assert_eq!(row.len(), 5);
    }

    #[test]
    fn row_length_equals_header_length_for_every_variant() {
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "tags": ["noun"]
        }));
        let mut m = Metadata::default();
        m.week = Some(1);
        m.topic = "Housing".into();

        let variants = vec![
            CardFormat::AnkiApp,
            CardFormat::Phrases,
            CardFormat::Anki,
            CardFormat::Quizlet,
            CardFormat::generic_default(),
        ];
        for format in variants {
            let f = formatter(format);
            let row = f.format_entry(&e, &m);
            assert_eq!(row.len(), f.headers().len(), "{}", f.format().as_str());
        }
    }

    #[test]
    fn formatting_is_deterministic() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "example": "Das Haus ist groß.",
            "tags": ["noun", "building"]
        }));
        let mut m = Metadata::default();
        m.week = Some(2);
        m.topic = "Housing".into();
        assert_eq!(f.format_entry(&e, &m), f.format_entry(&e, &m));
    }

    #[test]
    fn phrases_back_has_context_and_level_lines() {
        let f = formatter(CardFormat::Phrases);
        let e = entry(json!({"target": "Guten Tag", "native": "Good day"}));
        let mut m = Metadata::default();
        m.target_language = "german".into();
        m.week = Some(1);
        m.section_topic = "Greetings & Politeness".into();
        let row = f.format_entry(&e, &m);
        assert_eq!(
            row[1],
            "👋 Good day<br>Context: Greetings & Politeness<br>Level: German Week 1"
        );
    }

    #[test]
    fn phrases_omits_level_without_week() {
        let f = formatter(CardFormat::Phrases);
        let e = entry(json!({"target": "Danke", "native": "Thanks"}));
        let row = f.format_entry(&e, &Metadata::default());
        assert!(!row[1].contains("Level:"));
    }

    #[test]
    fn anki_row_space_joins_tags() {
        let f = formatter(CardFormat::Anki);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "example": "Das Haus ist groß.",
            "content_type": "grammar"
        }));
        let mut m = Metadata::default();
        m.unit = Some(3);
        m.topic = "Housing".into();
        let row = f.format_entry(&e, &m);
        assert_eq!(row.len(), 3);
        assert_eq!(
            row[1],
            "<b>the house</b><br><b>Example:</b> Das Haus ist groß."
        );
        assert_eq!(row[2], "Week3 Housing Grammar");
    }

    #[test]
    fn quizlet_row_is_two_columns_without_header() {
        let f = formatter(CardFormat::Quizlet);
        let e = entry(json!({
            "target": "merci",
            "native": "thank you",
            "example": "Merci beaucoup!",
            "example_translation": "Thank you very much!"
        }));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(
            row,
            vec![
                "merci",
                "thank you | Example: Merci beaucoup! | (Thank you very much!)"
            ]
        );
    }

    #[test]
    fn generic_unmapped_header_yields_empty() {
        let format = CardFormat::Generic {
            headers: vec!["Word".into(), "Meaning".into(), "Origin".into()],
            mapping: [("word", "target"), ("meaning", "native")]
                .into_iter()
                .map(|(h, f)| (h.to_string(), f.to_string()))
                .collect(),
        };
        let f = formatter(format);
        let e = entry(json!({"target": "hola", "native": "hello"}));
        let row = f.format_entry(&e, &Metadata::default());
        assert_eq!(row, vec!["hola", "hello", ""]);
    }

    #[test]
    fn validate_entry_checks_required_roles() {
        let f = formatter(CardFormat::AnkiApp);
        assert!(f.validate_entry(&entry(json!({"target": "a", "native": "b"}))));
        assert!(!f.validate_entry(&entry(json!({"target": "a"}))));
        assert!(!f.validate_entry(&entry(json!({"target": "", "native": "b"}))));
    }

    #[test]
    fn tags_scenario_week_and_topic() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"german": "Hallo", "english": "Hello"}));
        let mut m = Metadata::default();
        m.week = Some(1);
        m.section_topic = "Greetings".into();
        let tags = synthesize_tags(&e, &m, &resolver);
        assert_eq!(tags, vec!["Week1", "Greetings"]);
    }

    #[test]
    fn tags_clean_compound_topic() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"target": "x"}));
        let mut m = Metadata::default();
        m.topic = "greetings and politeness, basics".into();
        let tags = synthesize_tags(&e, &m, &resolver);
        assert_eq!(tags, vec!["Greetings"]);

        m.topic = "Food & Drink".into();
        let tags = synthesize_tags(&e, &m, &resolver);
        assert_eq!(tags, vec!["Food"]);
    }

    #[test]
    fn tags_limit_entry_tags_to_two_in_order() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"target": "x", "tags": ["a", "b", "c"]}));
        let tags = synthesize_tags(&e, &Metadata::default(), &resolver);
        assert_eq!(tags, vec!["A", "B"]);
    }

    #[test]
    fn tags_skip_default_content_type_and_dedup() {
        let resolver = FieldResolver::new();
        let e = entry(json!({"target": "x", "content_type": "Vocabulary"}));
        assert!(synthesize_tags(&e, &Metadata::default(), &resolver).is_empty());

        let e = entry(json!({"target": "x", "type": "grammar", "tags": ["grammar"]}));
        let tags = synthesize_tags(&e, &Metadata::default(), &resolver);
        assert_eq!(tags, vec!["Grammar"]);
    }

    #[test]
    fn preview_text_lists_front_back_tags() {
        let f = formatter(CardFormat::AnkiApp);
        let e = entry(json!({
            "target": "das Haus",
            "native": "the house",
            "example": "Das Haus ist groß.",
            "example_translation": "The house is big.",
            "connections": {"dutch": "het huis"}
        }));
        let text = f.preview_text(&e, &Metadata::default());
        assert!(text.starts_with("Front: das Haus\n\nBack: <b>the house</b>"));
        assert!(text.contains("🔗 Dutch: <i>het huis</i>"));
        assert!(text.contains("<i>Translation:</i> The house is big."));
        assert!(text.ends_with("Tags: "));
    }

    #[test]
    fn format_names_round_trip() {
        for name in ["ankiapp", "phrases", "anki", "quizlet", "generic"] {
            let format = CardFormat::from_name(name).unwrap();
            assert_eq!(format.as_str(), name);
        }
        assert!(CardFormat::from_name("unknown").is_none());
    }
}
