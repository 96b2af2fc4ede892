//! Core flashcard-generation library shared by the desktop and CLI frontends.
//!
//! Provides:
//! - Content tree walker for schema-free nested JSON vocabulary documents
//! - Field resolver mapping arbitrary field names to canonical roles, with
//!   per-document language auto-detection
//! - Card formatters for the supported export dialects (AnkiApp, Phrases,
//!   Anki, Quizlet, Generic) and shared tag synthesis
//! - CSV emitter with HTML-aware escaping and per-row failure isolation
//! - Generator façade turning a JSON file into a timestamped CSV export

pub mod emitter;
pub mod error;
pub mod formatter;
pub mod generator;
pub mod resolver;
pub mod types;
pub mod walker;

pub use emitter::{emit, escape_field};
pub use error::{GeneratorError, Result};
pub use formatter::{synthesize_tags, CardFormat, CardFormatter};
pub use generator::CsvGenerator;
pub use resolver::FieldResolver;
pub use types::{
    CanonicalRole, Entry, ExportReport, FormattedCard, GeneratorSettings, Metadata,
};
pub use walker::walk;
