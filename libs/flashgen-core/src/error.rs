//! Error types for flashgen-core.

use thiserror::Error;

/// Result type alias using GeneratorError.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur while generating flashcard exports.
///
/// `Document` and the I/O variants are file-level: they abort the current
/// file only. `EntryFormat` is row-level and is caught, counted, and logged
/// by the emitter without aborting the batch.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("document is not traversable: {0}")]
    Document(String),

    #[error("failed to format entry: {0}")]
    EntryFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// True for row-level failures that the emitter recovers from locally.
    pub fn is_row_level(&self) -> bool {
        matches!(self, Self::EntryFormat(_))
    }
}
