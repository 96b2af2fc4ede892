//! Generation façade: JSON document in, CSV file out.
//!
//! Ties the pipeline together: read + parse the source file, walk the content
//! tree, build a per-document resolver, format each entry, and emit. The
//! `try_*` methods return typed errors; the plain `generate_*` methods are the
//! collaborator-facing façade where file-level and I/O failures surface as
//! `None` plus a log entry, per the export panel's contract.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, warn};

use crate::emitter::emit;
use crate::error::{GeneratorError, Result};
use crate::formatter::{CardFormat, CardFormatter};
use crate::resolver::FieldResolver;
use crate::types::{Entry, ExportReport, GeneratorSettings, Metadata};
use crate::walker::walk;

/// Generates flashcard CSV files into an output directory.
pub struct CsvGenerator {
    output_dir: PathBuf,
    settings: GeneratorSettings,
}

impl CsvGenerator {
    /// Creates the output directory; a failure here is logged and resurfaces
    /// as an I/O error from the first export.
    pub fn new(output_dir: impl Into<PathBuf>, settings: GeneratorSettings) -> Self {
        let output_dir = output_dir.into();
        if let Err(err) = fs::create_dir_all(&output_dir) {
            warn!(
                dir = %output_dir.display(),
                error = %err,
                "could not create output directory"
            );
        }
        Self {
            output_dir,
            settings,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate a CSV from a JSON file. The output lands at
    /// `{output_dir}/{file_stem}_{timestamp}.csv`.
    pub fn try_generate_from_json_file(
        &self,
        source: &Path,
        format: CardFormat,
    ) -> Result<ExportReport> {
        let raw = fs::read_to_string(source)?;
        let document = serde_json::from_str(&raw)?;

        let pairs = walk(&document, Metadata::default());
        if pairs.is_empty() {
            return Err(GeneratorError::Document(format!(
                "no entries found in {}",
                source.display()
            )));
        }

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("flashcards");
        let filename = format!("{stem}_{}.csv", timestamp());
        self.export(&pairs, format, &filename)
    }

    /// Façade over [`CsvGenerator::try_generate_from_json_file`]: file-level
    /// and I/O errors are logged and become `None`.
    pub fn generate_from_json_file(&self, source: &Path, format: CardFormat) -> Option<PathBuf> {
        match self.try_generate_from_json_file(source, format) {
            Ok(report) => Some(report.path),
            Err(err) => {
                error!(source = %source.display(), error = %err, "CSV generation failed");
                None
            }
        }
    }

    /// Generate a CSV from an in-memory entry list, applying `metadata` to
    /// every entry. `filename` defaults to `{content_type}_{timestamp}.csv`;
    /// a missing `.csv` extension is appended.
    pub fn try_generate_from_entries(
        &self,
        entries: &[Entry],
        metadata: &Metadata,
        filename: Option<&str>,
        format: CardFormat,
    ) -> Result<ExportReport> {
        if entries.is_empty() {
            return Err(GeneratorError::Document("no entries provided".to_string()));
        }

        let pairs: Vec<(Entry, Metadata)> = entries
            .iter()
            .map(|entry| (entry.clone(), metadata.clone()))
            .collect();

        let filename = match filename {
            Some(name) if name.ends_with(".csv") => name.to_string(),
            Some(name) => format!("{name}.csv"),
            None => format!("{}_{}.csv", metadata.content_type, timestamp()),
        };
        self.export(&pairs, format, &filename)
    }

    /// Façade over [`CsvGenerator::try_generate_from_entries`].
    pub fn generate_from_entries(
        &self,
        entries: &[Entry],
        metadata: &Metadata,
        filename: Option<&str>,
        format: CardFormat,
    ) -> Option<PathBuf> {
        match self.try_generate_from_entries(entries, metadata, filename, format) {
            Ok(report) => Some(report.path),
            Err(err) => {
                error!(error = %err, "CSV generation failed");
                None
            }
        }
    }

    /// Render a single entry as preview text for display layers.
    pub fn preview(&self, entry: &Entry, format: CardFormat) -> String {
        let resolver = FieldResolver::for_entries([entry]);
        let formatter = CardFormatter::with_resolver(format, self.settings.clone(), resolver);
        formatter.preview_text(entry, &Metadata::default())
    }

    fn export(
        &self,
        pairs: &[(Entry, Metadata)],
        format: CardFormat,
        filename: &str,
    ) -> Result<ExportReport> {
        // Resolver is rebuilt per document so one file's language detection
        // never leaks into the next.
        let resolver = FieldResolver::for_entries(pairs.iter().map(|(entry, _)| entry));
        let formatter = CardFormatter::with_resolver(format, self.settings.clone(), resolver);

        let destination = self.output_dir.join(filename);

        let rows = pairs.iter().map(|(entry, metadata)| {
            if formatter.validate_entry(entry) {
                Ok(formatter.format_entry(entry, metadata))
            } else {
                Err(GeneratorError::EntryFormat(format!(
                    "entry is missing required fields: {}",
                    missing_roles(&formatter, entry)
                )))
            }
        });

        // Header rows are a preview-layer convenience; export files carry
        // entries only.
        let report = emit(rows, &[], &destination)?;
        if report.failure_count > 0 {
            warn!(
                exported = report.success_count,
                total = report.total(),
                "some entries were skipped"
            );
        }
        Ok(report)
    }
}

fn missing_roles(formatter: &CardFormatter, entry: &Entry) -> String {
    let missing: Vec<&str> = formatter
        .required_roles()
        .iter()
        .filter(|role| formatter.resolver().resolve(entry, **role).is_empty())
        .map(|role| role.as_str())
        .collect();
    missing.join(", ")
}

fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M").to_string()
}
