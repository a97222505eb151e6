//! Gazetteers for weak labeling and NER bootstrapping, generated from a SKU
//! catalog plus curated seeds.

pub mod build;
pub mod catalog;
pub mod seeds;
pub mod text;

pub use build::{GazetteerCounts, Gazetteers};
pub use catalog::{CatalogRow, read_catalog, read_catalog_file};
pub use text::Normalizer;

use crate::Result;
use std::path::Path;

/// Read the catalog at `catalog`, build every table and write them into `out`.
pub fn build_gazetteers(catalog: &str, out: &Path) -> Result<GazetteerCounts> {
    let norm = Normalizer::new()?;
    let rows = read_catalog_file(catalog, &norm)?;
    let gazetteers = Gazetteers::build(&rows, &norm)?;
    gazetteers.write_to_dir(out)
}
