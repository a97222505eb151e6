//! Batch validation of a JSONL annotation file.
//!
//! Each non-blank line is decoded and validated on its own; a bad line is
//! recorded as an issue and never stops the run. Only IO errors abort.

use crate::Result;
use crate::annotation::jsonl::{RecordError, parse_record_line};
use crate::annotation::label::Label;
use crate::annotation::record::AnnotationRecord;
use crate::annotation::validate::validate;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;

#[derive(Debug, Clone, Serialize)]
pub struct LineIssue {
    /// 1-based line number in the source file.
    pub line: usize,
    pub kind: &'static str,
    /// Offending span index, when the failure is span-level.
    pub span: Option<usize>,
    pub message: String,
}

/// Two spans of one record whose ranges overlap without being identical.
/// Allowed by the format; surfaced for review only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub line: usize,
    pub first: usize,
    pub second: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub records: usize,
    pub valid: usize,
    pub issues: Vec<LineIssue>,
    pub label_counts: BTreeMap<Label, usize>,
    pub overlaps: Vec<Overlap>,
}

impl ValidationReport {
    pub fn from_jsonl_str(text: &str) -> Self {
        let mut report = ValidationReport::default();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            report.push_line(lineno + 1, line);
        }
        report
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push_line(&mut self, line: usize, raw: &str) {
        self.records += 1;
        let checked = parse_record_line(raw)
            .and_then(|rec| validate(&rec).map(|()| rec).map_err(RecordError::from));

        match checked {
            Ok(rec) => {
                self.valid += 1;
                self.tally(line, &rec);
            }
            Err(err) => {
                tracing::debug!("line {}: {}", line, err);
                let span = match &err {
                    RecordError::Invalid(e) => Some(e.span_index()),
                    RecordError::Malformed(_) => None,
                };
                self.issues.push(LineIssue {
                    line,
                    kind: err.kind(),
                    span,
                    message: err.to_string(),
                });
            }
        }
    }

    fn tally(&mut self, line: usize, rec: &AnnotationRecord) {
        for span in &rec.entities {
            if let Some(label) = span.label() {
                *self.label_counts.entry(label).or_default() += 1;
            }
        }
        for (i, a) in rec.entities.iter().enumerate() {
            for (j, b) in rec.entities.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) && a.range() != b.range() {
                    tracing::debug!("line {}: spans {} and {} overlap", line, i, j);
                    self.overlaps.push(Overlap {
                        line,
                        first: i,
                        second: j,
                    });
                }
            }
        }
    }
}

/// Validate every record of a JSONL file.
pub fn validate_jsonl_file(path: &str) -> Result<ValidationReport> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read annotation file {}", path))?;
    let report = ValidationReport::from_jsonl_str(&text);
    tracing::info!(
        "{}: {} records, {} valid, {} issues",
        path,
        report.records,
        report.valid,
        report.issues.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FILE: &str = r#"{"text": "I'm applying the NARS Radiant Creamy Concealer in Custard.", "entities": [[17, 21, "BRAND"], [22, 46, "PRODUCT"], [50, 57, "SHADE"]]}

{"text": "Blend with a sponge", "entities": [[0, 5, "COLOR"]]}
{"text": "Blend with a sponge", "entities": [[13, 19, "TOOL"], [13, 19, "TOOL"]]}
{"text": "oops"
{"text": "Sigma F80 kabuki brush", "entities": [[0, 22, "PRODUCT"], [10, 22, "TOOL"]]}
{"text": "short", "entities": [[5, 5, "TOOL"]]}
"#;

    #[test]
    fn collects_one_issue_per_bad_line() {
        let report = ValidationReport::from_jsonl_str(FILE);
        assert_eq!(report.records, 6);
        assert_eq!(report.valid, 2);
        assert!(!report.is_clean());

        let got: Vec<(usize, &str, Option<usize>)> = report
            .issues
            .iter()
            .map(|i| (i.line, i.kind, i.span))
            .collect();
        assert_eq!(
            got,
            vec![
                (3, "UnknownLabel", Some(0)),
                (4, "DuplicateSpan", Some(1)),
                (5, "Malformed", None),
                (7, "OutOfBoundsSpan", Some(0)),
            ]
        );
    }

    #[test]
    fn tallies_labels_of_valid_records_only() {
        let report = ValidationReport::from_jsonl_str(FILE);
        let counts: Vec<(Label, usize)> =
            report.label_counts.iter().map(|(l, c)| (*l, *c)).collect();
        assert_eq!(
            counts,
            vec![
                (Label::Brand, 1),
                (Label::Product, 2),
                (Label::Shade, 1),
                (Label::Tool, 1),
            ]
        );
    }

    #[test]
    fn reports_overlaps_as_warnings() {
        let report = ValidationReport::from_jsonl_str(FILE);
        assert_eq!(
            report.overlaps,
            vec![Overlap {
                line: 6,
                first: 0,
                second: 1
            }]
        );
    }

    #[test]
    fn offsets_past_i64_are_out_of_bounds() {
        let report = ValidationReport::from_jsonl_str(
            r#"{"text": "abc", "entities": [[0, 9223372036854775808, "TOOL"]]}
{"text": "abc", "entities": [[0, 2.0, "TOOL"]]}"#,
        );
        let got: Vec<(usize, &str, Option<usize>)> = report
            .issues
            .iter()
            .map(|i| (i.line, i.kind, i.span))
            .collect();
        assert_eq!(got, vec![(1, "OutOfBoundsSpan", Some(0))]);
        assert_eq!(report.valid, 1);
    }

    #[test]
    fn empty_input_is_clean() {
        let report = ValidationReport::from_jsonl_str("\n\n");
        assert_eq!(report.records, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn serializes_label_keys_uppercase() {
        let report = ValidationReport::from_jsonl_str(
            r#"{"text": "spoolie", "entities": [[0, 7, "TOOL"]]}"#,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["label_counts"]["TOOL"], 1);
        assert_eq!(json["valid"], 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(validate_jsonl_file("/definitely/not/here.jsonl").is_err());
    }
}
