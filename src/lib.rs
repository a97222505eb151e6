//! Annotation tooling for cosmetics mentions in tutorial transcripts.
//!
//! - `annotation`: JSONL span records, the span validator and batch reports.
//! - `gazetteer`: catalog-driven gazetteers for weak labeling.

pub mod annotation;
pub mod gazetteer;

pub type Result<T> = anyhow::Result<T>;
