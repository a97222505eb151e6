//! SKU catalog loading (sku_catalog.csv).
//!
//! Columns used: Brand, Product Name, Product Type, Category Group, Shade Name.
//! A missing column reads as empty for every row; other columns are ignored.

use crate::Result;
use crate::gazetteer::text::Normalizer;
use anyhow::Context;
use std::io::Read;

/// One catalog row with every field already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    pub brand: String,
    pub product_name: String,
    pub product_type: String,
    pub category_group: String,
    pub shade_name: String,
}

const COLUMNS: [&str; 5] = [
    "Brand",
    "Product Name",
    "Product Type",
    "Category Group",
    "Shade Name",
];

pub fn read_catalog_file(path: &str, norm: &Normalizer) -> Result<Vec<CatalogRow>> {
    let file = std::fs::File::open(path).with_context(|| format!("open catalog {}", path))?;
    read_catalog(file, norm).with_context(|| format!("read catalog {}", path))
}

pub fn read_catalog<R: Read>(input: R, norm: &Normalizer) -> Result<Vec<CatalogRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers()?.clone();
    let idx: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|name| headers.iter().position(|h| h.trim() == *name))
        .collect();
    for (name, i) in COLUMNS.iter().zip(&idx) {
        if i.is_none() {
            tracing::warn!("catalog has no {:?} column; treating it as empty", name);
        }
    }

    let mut rows = Vec::new();
    for (n, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("catalog row {}", n + 2))?;
        let field = |col: usize| -> String {
            idx[col]
                .and_then(|i| record.get(i))
                .map(|v| norm.norm(v))
                .unwrap_or_default()
        };
        rows.push(CatalogRow {
            brand: field(0),
            product_name: field(1),
            product_type: field(2),
            category_group: field(3),
            shade_name: field(4),
        });
    }

    tracing::debug!("loaded {} catalog rows", rows.len());
    Ok(rows)
}
