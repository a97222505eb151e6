//! JSON Lines IO for annotation records.

use crate::Result;
use crate::annotation::record::AnnotationRecord;
use crate::annotation::validate::ValidationError;
use anyhow::Context;
use std::fs;
use std::io::{BufWriter, Write};
use thiserror::Error;

/// Why a single JSONL line was rejected.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl RecordError {
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::Malformed(_) => "Malformed",
            RecordError::Invalid(e) => e.kind(),
        }
    }
}

/// Decode one JSONL line. Exactly the keys `text` and `entities` are accepted.
pub fn parse_record_line(line: &str) -> std::result::Result<AnnotationRecord, RecordError> {
    Ok(serde_json::from_str(line)?)
}

/// Read every record of a JSONL file, failing on the first undecodable line.
/// Blank lines are skipped. Records are decoded, not validated.
pub fn read_jsonl_file(path: &str) -> Result<Vec<AnnotationRecord>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read annotation file {}", path))?;

    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record_line(line)
            .with_context(|| format!("annotation parse error at {}:{}", path, lineno + 1))?;
        out.push(record);
    }

    tracing::debug!("read {} records from {}", out.len(), path);
    Ok(out)
}

/// Write records one per line, spans in the [start, end, "LABEL"] shape.
pub fn write_jsonl(path: &str, records: &[AnnotationRecord]) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("create {}", path))?;
    let mut w = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut w, record)?;
        w.write_all(b"\n")?;
    }
    w.flush().with_context(|| format!("write {}", path))?;
    Ok(())
}
