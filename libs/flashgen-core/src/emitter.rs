//! CSV emission with HTML-aware escaping and per-row failure isolation.
//!
//! Back fields embed HTML, and AnkiApp's importer chokes on bare angle
//! brackets, so quoting triggers on `<` and `>` in addition to the RFC4180
//! set. One bad row never aborts the batch: row-level errors are logged,
//! counted, and skipped (bulkhead policy), and everything written so far is
//! flushed even on partial failure.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::types::ExportReport;

/// How many row-level failure reasons an [`ExportReport`] retains.
const MAX_REPORTED_FAILURES: usize = 3;

/// Write formatted rows to `destination`.
///
/// The header row is written iff `headers` is non-empty. Row items carry the
/// per-row outcome: an `Err` is counted as a failure and skipped, as is a row
/// whose length disagrees with the header count. Returns where the file went
/// and how many rows succeeded/failed; file-level I/O errors propagate.
pub fn emit<I>(rows: I, headers: &[String], destination: &Path) -> Result<ExportReport>
where
    I: IntoIterator<Item = Result<Vec<String>>>,
{
    let file = File::create(destination)?;
    let mut writer = BufWriter::new(file);

    if !headers.is_empty() {
        write_row(&mut writer, headers)?;
    }

    let mut success_count = 0;
    let mut failure_count = 0;
    let mut failures = Vec::new();

    for row in rows {
        match row {
            Ok(fields) => {
                if !headers.is_empty() && fields.len() != headers.len() {
                    failure_count += 1;
                    record_failure(
                        &mut failures,
                        format!(
                            "row has {} fields, expected {}",
                            fields.len(),
                            headers.len()
                        ),
                    );
                    continue;
                }
                write_row(&mut writer, &fields)?;
                success_count += 1;
            }
            Err(err) => {
                warn!(error = %err, "skipping row");
                failure_count += 1;
                record_failure(&mut failures, err.to_string());
            }
        }
    }

    writer.flush()?;
    info!(
        path = %destination.display(),
        success_count,
        failure_count,
        "wrote CSV"
    );

    Ok(ExportReport {
        path: destination.to_path_buf(),
        success_count,
        failure_count,
        failures,
    })
}

fn record_failure(failures: &mut Vec<String>, reason: String) {
    if failures.len() < MAX_REPORTED_FAILURES {
        failures.push(reason);
    }
}

fn write_row<W: Write>(writer: &mut W, fields: &[String]) -> Result<()> {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    writer.write_all(line.join(",").as_bytes())?;
    writer.write_all(b"\r\n")?;
    Ok(())
}

/// Quote a field iff it contains a comma, double quote, newline, or angle
/// bracket; internal quotes are doubled. Fields without those characters are
/// passed through unquoted.
pub fn escape_field(field: &str) -> String {
    let needs_quoting = field
        .chars()
        .any(|c| matches!(c, ',' | '"' | '\n' | '\r' | '<' | '>'));
    if needs_quoting {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
