//! Annotation record and span types.
//!
//! Construction is permissive: a `Span` can carry out-of-range offsets or a
//! label outside the closed set, so that `validate` can report the problem
//! instead of the JSON decoder rejecting the whole line.

use crate::annotation::label::Label;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One annotated sentence/chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationRecord {
    pub text: String,
    pub entities: Vec<Span>,
}

/// A labeled character range `[start, end)` within the record text.
///
/// Persisted as a three-element array: [start, end, "LABEL"].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSpan", into = "RawSpan")]
pub struct Span {
    pub start: i64,
    pub end: i64,
    pub label: String,
}

#[derive(Serialize, Deserialize)]
struct RawSpan(
    #[serde(deserialize_with = "offset")] i64,
    #[serde(deserialize_with = "offset")] i64,
    String,
);

/// Any JSON integer, or an integral float, saturated into i64. Values past
/// i64 can never be in bounds, so saturating keeps them `OutOfBoundsSpan`.
fn offset<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    struct OffsetVisitor;

    impl Visitor<'_> for OffsetVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer character offset")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            Ok(i64::try_from(v).unwrap_or(i64::MAX))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 {
                // `as` saturates at the i64 range.
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    d.deserialize_any(OffsetVisitor)
}

impl From<RawSpan> for Span {
    fn from(RawSpan(start, end, label): RawSpan) -> Self {
        Span { start, end, label }
    }
}

impl From<Span> for RawSpan {
    fn from(span: Span) -> Self {
        RawSpan(span.start, span.end, span.label)
    }
}

impl Span {
    pub fn new(start: i64, end: i64, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn range(&self) -> (i64, i64) {
        (self.start, self.end)
    }

    /// Parsed label, if it belongs to the closed set.
    pub fn label(&self) -> Option<Label> {
        Label::parse(&self.label)
    }

    /// True when the two half-open ranges share at least one character.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl AnnotationRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: Vec::new(),
        }
    }

    /// Text length in characters, the unit all offsets are measured in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Surface text covered by span `idx`, sliced by character offsets.
    /// None when the index or the offsets are out of range.
    pub fn span_text(&self, idx: usize) -> Option<&str> {
        let span = self.entities.get(idx)?;
        let start = usize::try_from(span.start).ok()?;
        let end = usize::try_from(span.end).ok()?;
        if start > end {
            return None;
        }
        let lo = self.byte_offset(start)?;
        let hi = self.byte_offset(end)?;
        self.text.get(lo..hi)
    }

    /// Locate the first occurrence of `needle` and append a span for it.
    /// Returns the new span's index, or None when `needle` is absent or empty.
    pub fn find_span(&mut self, needle: &str, label: Label) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let byte_start = self.text.find(needle)?;
        let start = self.text[..byte_start].chars().count();
        let end = start + needle.chars().count();
        self.entities
            .push(Span::new(start as i64, end as i64, label.as_str()));
        Some(self.entities.len() - 1)
    }

    // Char offset -> byte offset; `chars` == char_len maps to text.len().
    fn byte_offset(&self, chars: usize) -> Option<usize> {
        self.text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(self.text.len()))
            .nth(chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn span_round_trips_as_triple() {
        let span: Span = serde_json::from_str(r#"[3, 9, "TOOL"]"#).unwrap();
        assert_eq!(span, Span::new(3, 9, "TOOL"));
        assert_eq!(serde_json::to_string(&span).unwrap(), r#"[3,9,"TOOL"]"#);
    }

    #[test]
    fn record_rejects_extra_keys() {
        let line = r#"{"text": "x", "entities": [], "meta": 1}"#;
        assert!(serde_json::from_str::<AnnotationRecord>(line).is_err());
    }

    #[test]
    fn record_requires_entities_key() {
        assert!(serde_json::from_str::<AnnotationRecord>(r#"{"text": "x"}"#).is_err());
    }

    #[test]
    fn negative_offsets_still_decode() {
        let span: Span = serde_json::from_str(r#"[-1, 2, "BRAND"]"#).unwrap();
        assert_eq!(span.range(), (-1, 2));
    }

    #[test]
    fn oversized_offsets_saturate() {
        let span: Span = serde_json::from_str(r#"[0, 9223372036854775808, "TOOL"]"#).unwrap();
        assert_eq!(span.range(), (0, i64::MAX));
        let span: Span = serde_json::from_str(r#"[-1e30, 1e30, "TOOL"]"#).unwrap();
        assert_eq!(span.range(), (i64::MIN, i64::MAX));
    }

    #[test]
    fn integral_float_offsets_decode() {
        let span: Span = serde_json::from_str(r#"[1.0, 2.0, "TOOL"]"#).unwrap();
        assert_eq!(span, Span::new(1, 2, "TOOL"));
    }

    #[test]
    fn find_span_counts_characters_not_bytes() {
        let mut rec = AnnotationRecord::new("Crème brûlée by Fenty");
        let idx = rec.find_span("Fenty", Label::Brand).unwrap();
        assert_eq!(rec.entities[idx], Span::new(16, 21, "BRAND"));
        assert_eq!(rec.span_text(idx), Some("Fenty"));
        assert_eq!(rec.char_len(), 21);
    }

    #[test]
    fn span_text_handles_multibyte_ranges() {
        let mut rec = AnnotationRecord::new("shade Crème brûlée");
        rec.entities.push(Span::new(6, 18, "SHADE"));
        assert_eq!(rec.span_text(0), Some("Crème brûlée"));
    }

    #[test]
    fn span_text_out_of_range_is_none() {
        let mut rec = AnnotationRecord::new("abc");
        rec.entities.push(Span::new(1, 4, "TOOL"));
        rec.entities.push(Span::new(-1, 2, "TOOL"));
        assert_eq!(rec.span_text(0), None);
        assert_eq!(rec.span_text(1), None);
        assert_eq!(rec.span_text(2), None);
    }

    #[test]
    fn missing_needle_adds_nothing() {
        let mut rec = AnnotationRecord::new("a kabuki brush");
        assert_eq!(rec.find_span("sponge", Label::Tool), None);
        assert!(rec.entities.is_empty());
    }

    #[test]
    fn overlap_is_half_open() {
        let a = Span::new(0, 5, "PRODUCT");
        assert!(a.overlaps(&Span::new(4, 6, "TOOL")));
        assert!(!a.overlaps(&Span::new(5, 6, "TOOL")));
    }
}
