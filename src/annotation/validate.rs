//! Format contract for a single annotation record.
//!
//! Three passes run in order and the first failure wins:
//! 1) every span has 0 <= start < end <= char_len(text)
//! 2) every label is one of BRAND, PRODUCT, SHADE, TOOL
//! 3) no two spans share an identical (start, end)
//!
//! Overlapping but non-identical ranges are allowed.

use crate::annotation::label::Label;
use crate::annotation::record::AnnotationRecord;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("span {index}: offsets [{start}, {end}) out of bounds for text of {len} chars")]
    OutOfBoundsSpan {
        index: usize,
        start: i64,
        end: i64,
        len: usize,
    },

    #[error("span {index}: unknown label {label:?}")]
    UnknownLabel { index: usize, label: String },

    #[error("span {index}: range [{start}, {end}) duplicates span {first}")]
    DuplicateSpan {
        index: usize,
        first: usize,
        start: i64,
        end: i64,
    },
}

impl ValidationError {
    /// Index of the offending span.
    pub fn span_index(&self) -> usize {
        match self {
            ValidationError::OutOfBoundsSpan { index, .. }
            | ValidationError::UnknownLabel { index, .. }
            | ValidationError::DuplicateSpan { index, .. } => *index,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::OutOfBoundsSpan { .. } => "OutOfBoundsSpan",
            ValidationError::UnknownLabel { .. } => "UnknownLabel",
            ValidationError::DuplicateSpan { .. } => "DuplicateSpan",
        }
    }
}

/// Check a record against the format contract. Pure; no side effects.
pub fn validate(record: &AnnotationRecord) -> Result<(), ValidationError> {
    let len = record.char_len();

    for (index, span) in record.entities.iter().enumerate() {
        let in_bounds =
            span.start >= 0 && span.start < span.end && span.end as u64 <= len as u64;
        if !in_bounds {
            return Err(ValidationError::OutOfBoundsSpan {
                index,
                start: span.start,
                end: span.end,
                len,
            });
        }
    }

    for (index, span) in record.entities.iter().enumerate() {
        if Label::parse(&span.label).is_none() {
            return Err(ValidationError::UnknownLabel {
                index,
                label: span.label.clone(),
            });
        }
    }

    let mut seen: HashMap<(i64, i64), usize> = HashMap::new();
    for (index, span) in record.entities.iter().enumerate() {
        if let Some(&first) = seen.get(&span.range()) {
            return Err(ValidationError::DuplicateSpan {
                index,
                first,
                start: span.start,
                end: span.end,
            });
        }
        seen.insert(span.range(), index);
    }

    Ok(())
}
