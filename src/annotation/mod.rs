//! Span annotation records and their format contract.
//!
//! One record per annotated chunk, persisted as JSON Lines:
//! {"text": "...", "entities": [[start, end, "LABEL"], ...]}
//!
//! Offsets count characters (not bytes), 0-indexed, end exclusive.

pub mod jsonl;
pub mod label;
pub mod record;
pub mod report;
pub mod validate;

pub use jsonl::{RecordError, parse_record_line, read_jsonl_file, write_jsonl};
pub use label::Label;
pub use record::{AnnotationRecord, Span};
pub use report::{LineIssue, Overlap, ValidationReport, validate_jsonl_file};
pub use validate::{ValidationError, validate};
