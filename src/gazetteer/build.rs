//! Gazetteer tables derived from the catalog plus seeds, and their TSV/TXT
//! rendering. Every table is de-duplicated and sorted case-insensitively so
//! reruns over the same catalog produce byte-identical files.

use crate::Result;
use crate::gazetteer::catalog::CatalogRow;
use crate::gazetteer::seeds::{
    BRAND_ALIAS_SEEDS, GENERIC_BRAND_TOKENS, GENERIC_STEM_PHRASES, GENERIC_STEM_WEIGHT,
    LAST_TOKEN_ALIAS_PRIORITY, SHADE_PATTERNS, STEM_WEIGHT, STOP_PHRASES, TOOL_PATTERNS,
    TOOL_SEEDS,
};
use crate::gazetteer::text::Normalizer;
use anyhow::{Context, bail};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct AliasRow {
    pub alias: String,
    pub brand: String,
    pub priority: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProductRow {
    pub brand: String,
    pub product_name: String,
    pub product_type: String,
    pub category_group: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StemRow {
    pub brand: String,
    pub stem: String,
    pub product_type: String,
    pub category_group: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShadeRow {
    pub brand: String,
    pub product_name: String,
    pub shade_name: String,
    pub shade_norm: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolRow {
    pub term: String,
    pub canonical: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Gazetteers {
    pub brands: Vec<String>,
    pub brand_aliases: Vec<AliasRow>,
    pub products_full: Vec<ProductRow>,
    pub products_stems: Vec<StemRow>,
    pub shades: Vec<ShadeRow>,
    pub shade_patterns: Vec<String>,
    pub tool_patterns: Vec<String>,
    pub stop_phrases: Vec<String>,
    pub tools: Vec<ToolRow>,
}

/// Row counts per output file, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerCounts(pub Vec<(&'static str, usize)>);

impl Gazetteers {
    pub fn build(rows: &[CatalogRow], norm: &Normalizer) -> Result<Self> {
        let brands: Vec<String> = rows
            .iter()
            .filter(|r| !r.brand.is_empty())
            .map(|r| r.brand.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let brand_aliases = build_aliases(&brands, norm);

        let mut products_full: Vec<ProductRow> = rows
            .iter()
            .filter(|r| !r.brand.is_empty() && !r.product_name.is_empty())
            .map(|r| ProductRow {
                brand: r.brand.clone(),
                product_name: r.product_name.clone(),
                product_type: r.product_type.clone(),
                category_group: r.category_group.clone(),
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        products_full.sort_by_cached_key(|p| {
            (
                norm.lower(&p.brand),
                norm.lower(&p.product_name),
                norm.lower(&p.product_type),
            )
        });

        let products_stems = build_stems(rows, &brands, norm);

        let mut shades: Vec<ShadeRow> = rows
            .iter()
            .filter(|r| {
                !r.brand.is_empty() && !r.product_name.is_empty() && !r.shade_name.is_empty()
            })
            .map(|r| ShadeRow {
                brand: r.brand.clone(),
                product_name: r.product_name.clone(),
                shade_name: r.shade_name.clone(),
                shade_norm: norm.norm_shade(&r.shade_name),
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        shades.sort_by_cached_key(|s| {
            (
                norm.lower(&s.brand),
                norm.lower(&s.product_name),
                norm.lower(&s.shade_name),
            )
        });

        let shade_patterns = checked_patterns(SHADE_PATTERNS)?;
        let tool_patterns = checked_patterns(TOOL_PATTERNS)?;
        let stop_phrases = sorted_unique(STOP_PHRASES);

        let mut tools: Vec<ToolRow> = TOOL_SEEDS
            .iter()
            .map(|&(term, canonical, weight)| ToolRow {
                term: term.to_string(),
                canonical: canonical.to_string(),
                weight,
            })
            .collect();
        tools.sort_by(|a, b| {
            norm.lower(&a.term)
                .cmp(&norm.lower(&b.term))
                .then(a.weight.total_cmp(&b.weight))
                .then_with(|| norm.lower(&a.canonical).cmp(&norm.lower(&b.canonical)))
        });
        tools.dedup();

        Ok(Self {
            brands,
            brand_aliases,
            products_full,
            products_stems,
            shades,
            shade_patterns,
            tool_patterns,
            stop_phrases,
            tools,
        })
    }

    /// Write every table into `out`, creating the directory if needed.
    pub fn write_to_dir(&self, out: &Path) -> Result<GazetteerCounts> {
        fs::create_dir_all(out).with_context(|| format!("create {}", out.display()))?;

        write_lines(&out.join("brands.tsv"), &self.brands)?;
        write_tsv(
            &out.join("brand_aliases.tsv"),
            self.brand_aliases
                .iter()
                .map(|a| vec![a.alias.clone(), a.brand.clone(), fmt_weight(a.priority)]),
        )?;
        write_tsv(
            &out.join("products_full.tsv"),
            self.products_full.iter().map(|p| {
                vec![
                    p.brand.clone(),
                    p.product_name.clone(),
                    p.product_type.clone(),
                    p.category_group.clone(),
                ]
            }),
        )?;
        write_tsv(
            &out.join("products_stems.tsv"),
            self.products_stems.iter().map(|s| {
                vec![
                    s.brand.clone(),
                    s.stem.clone(),
                    s.product_type.clone(),
                    s.category_group.clone(),
                    fmt_weight(s.weight),
                ]
            }),
        )?;
        write_tsv(
            &out.join("shades_master.tsv"),
            self.shades.iter().map(|s| {
                vec![
                    s.brand.clone(),
                    s.product_name.clone(),
                    s.shade_name.clone(),
                    s.shade_norm.clone(),
                ]
            }),
        )?;
        write_lines(&out.join("shade_patterns.txt"), &self.shade_patterns)?;
        write_lines(&out.join("tool_patterns.txt"), &self.tool_patterns)?;
        write_lines(&out.join("stop_phrases.txt"), &self.stop_phrases)?;
        write_tsv(
            &out.join("tools.tsv"),
            self.tools
                .iter()
                .map(|t| vec![t.term.clone(), t.canonical.clone(), fmt_weight(t.weight)]),
        )?;

        tracing::info!("gazetteers written to {}", out.display());
        Ok(self.counts())
    }

    pub fn counts(&self) -> GazetteerCounts {
        GazetteerCounts(vec![
            ("brands.tsv", self.brands.len()),
            ("brand_aliases.tsv", self.brand_aliases.len()),
            ("products_full.tsv", self.products_full.len()),
            ("products_stems.tsv", self.products_stems.len()),
            ("shades_master.tsv", self.shades.len()),
            ("shade_patterns.txt", self.shade_patterns.len()),
            ("tools.tsv", self.tools.len()),
            ("tool_patterns.txt", self.tool_patterns.len()),
            ("stop_phrases.txt", self.stop_phrases.len()),
        ])
    }
}

fn build_aliases(brands: &[String], norm: &Normalizer) -> Vec<AliasRow> {
    let mut rows: Vec<AliasRow> = BRAND_ALIAS_SEEDS
        .iter()
        .map(|&(alias, brand, priority)| AliasRow {
            alias: alias.to_string(),
            brand: brand.to_string(),
            priority,
        })
        .collect();

    // Last token of a brand becomes an alias when no other brand shares it.
    let mut by_last: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for brand in brands {
        if let Some(last) = norm.tokens(brand).last() {
            by_last
                .entry(norm.lower(last))
                .or_default()
                .insert(brand.as_str());
        }
    }
    for (last, owners) in &by_last {
        if owners.len() != 1 || GENERIC_BRAND_TOKENS.contains(&last.as_str()) {
            continue;
        }
        for brand in owners {
            if let Some(alias) = brand.split_whitespace().last() {
                rows.push(AliasRow {
                    alias: alias.to_string(),
                    brand: brand.to_string(),
                    priority: LAST_TOKEN_ALIAS_PRIORITY,
                });
            }
        }
    }

    rows.sort_by(|a, b| {
        norm.lower(&a.brand)
            .cmp(&norm.lower(&b.brand))
            .then_with(|| norm.lower(&a.alias).cmp(&norm.lower(&b.alias)))
            .then_with(|| a.brand.cmp(&b.brand))
            .then_with(|| a.alias.cmp(&b.alias))
            .then(a.priority.total_cmp(&b.priority))
    });
    rows.dedup();
    rows
}

fn build_stems(rows: &[CatalogRow], brands: &[String], norm: &Normalizer) -> Vec<StemRow> {
    let brand_tokens: BTreeMap<&str, BTreeSet<String>> = brands
        .iter()
        .map(|b| (b.as_str(), norm.brand_tokens(b)))
        .collect();
    let empty = BTreeSet::new();

    let mut stems = Vec::new();
    for r in rows {
        if r.brand.is_empty() || r.product_name.is_empty() {
            continue;
        }
        let tokens = brand_tokens.get(r.brand.as_str()).unwrap_or(&empty);
        let stem = norm.build_stem(&r.product_name, tokens);
        if stem.is_empty() || !norm.valid_stem(&stem) {
            continue;
        }
        let stem_l = norm.lower(&stem);
        let weight = if GENERIC_STEM_PHRASES.iter().any(|p| stem_l.contains(p)) {
            GENERIC_STEM_WEIGHT
        } else {
            STEM_WEIGHT
        };
        stems.push(StemRow {
            brand: r.brand.clone(),
            stem,
            product_type: r.product_type.clone(),
            category_group: r.category_group.clone(),
            weight,
        });
    }

    stems.sort_by(|a, b| {
        norm.lower(&a.brand)
            .cmp(&norm.lower(&b.brand))
            .then_with(|| norm.lower(&a.stem).cmp(&norm.lower(&b.stem)))
            .then_with(|| stem_tiebreak(a, b))
    });
    stems.dedup();
    stems
}

fn stem_tiebreak(a: &StemRow, b: &StemRow) -> Ordering {
    (&a.brand, &a.stem, &a.product_type, &a.category_group)
        .cmp(&(&b.brand, &b.stem, &b.product_type, &b.category_group))
        .then(a.weight.total_cmp(&b.weight))
}

/// Sorted seed patterns; each must compile as a regex.
fn checked_patterns(patterns: &[&str]) -> Result<Vec<String>> {
    for p in patterns {
        if let Err(e) = Regex::new(p) {
            bail!("invalid seed pattern {:?}: {}", p, e);
        }
    }
    Ok(sorted_unique(patterns))
}

fn sorted_unique(items: &[&str]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// 0.7 -> "0.7", 1.0 -> "1.0"
fn fmt_weight(w: f64) -> String {
    format!("{:?}", w)
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

// csv-written tables end records in CRLF, the plain line lists in LF.
fn write_tsv<I>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut w = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    for row in rows {
        w.write_record(&row)?;
    }
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(brand: &str, product: &str, ptype: &str, group: &str, shade: &str) -> CatalogRow {
        CatalogRow {
            brand: brand.into(),
            product_name: product.into(),
            product_type: ptype.into(),
            category_group: group.into(),
            shade_name: shade.into(),
        }
    }

    fn catalog() -> Vec<CatalogRow> {
        vec![
            row("Urban Decay", "Naked3 Eyeshadow Palette", "Eyeshadow Palette", "Eyes", ""),
            row("Too Faced", "Better Than Sex Mascara", "Mascara", "Eyes", ""),
            row("KVD Beauty", "Tattoo Liner", "Liquid Eyeliner", "Eyes", "Trooper Black"),
            row("Rare Beauty", "Soft Pinch Liquid Blush", "Blush", "Cheeks", "Joy"),
            row("NARS", "Radiant Creamy Concealer", "Concealer", "Face", "Crème Brûlée"),
            row("NARS", "Radiant Creamy Concealer", "Concealer", "Face", "Custard"),
            row("", "Orphan Product", "", "", ""),
            row("Too Faced", "Better Than Sex Mascara", "Mascara", "Eyes", ""),
        ]
    }

    fn build() -> Gazetteers {
        Gazetteers::build(&catalog(), &Normalizer::new().unwrap()).unwrap()
    }

    #[test]
    fn brands_are_unique_and_sorted() {
        assert_eq!(
            build().brands,
            vec!["KVD Beauty", "NARS", "Rare Beauty", "Too Faced", "Urban Decay"]
        );
    }

    #[test]
    fn derives_unique_last_token_aliases() {
        let g = build();
        let derived: Vec<(&str, &str)> = g
            .brand_aliases
            .iter()
            .filter(|a| a.priority == LAST_TOKEN_ALIAS_PRIORITY && a.alias.len() > 2)
            .map(|a| (a.alias.as_str(), a.brand.as_str()))
            .collect();
        // "Beauty" is shared and generic; NARS is its own last token.
        assert_eq!(
            derived,
            vec![("NARS", "NARS"), ("Faced", "Too Faced"), ("Decay", "Urban Decay")]
        );
        assert_eq!(g.brand_aliases.len(), BRAND_ALIAS_SEEDS.len() + 3);
    }

    #[test]
    fn aliases_sorted_by_brand_then_alias() {
        let g = build();
        let pairs: Vec<(String, String)> = g
            .brand_aliases
            .iter()
            .map(|a| (a.brand.to_lowercase(), a.alias.to_lowercase()))
            .collect();
        let mut sorted = pairs.clone();
        sorted.sort();
        assert_eq!(pairs, sorted);
    }

    #[test]
    fn products_skip_rows_without_brand_and_dedup() {
        let g = build();
        assert_eq!(g.products_full.len(), 5);
        assert_eq!(g.products_full[0].brand, "KVD Beauty");
    }

    #[test]
    fn stems_and_weights() {
        let g = build();
        let stems: Vec<(&str, &str, f64)> = g
            .products_stems
            .iter()
            .map(|s| (s.brand.as_str(), s.stem.as_str(), s.weight))
            .collect();
        assert_eq!(
            stems,
            vec![
                ("NARS", "Radiant Creamy", 1.0),
                ("Rare Beauty", "Soft Pinch", 1.0),
                ("Too Faced", "Better Than Sex", 1.0),
            ]
        );
    }

    #[test]
    fn shades_carry_folded_name() {
        let g = build();
        let shades: Vec<(&str, &str)> = g
            .shades
            .iter()
            .map(|s| (s.shade_name.as_str(), s.shade_norm.as_str()))
            .collect();
        assert_eq!(
            shades,
            vec![
                ("Trooper Black", "trooper black"),
                ("Crème Brûlée", "creme brulee"),
                ("Custard", "custard"),
                ("Joy", "joy"),
            ]
        );
    }

    #[test]
    fn tools_sorted_by_term() {
        let g = build();
        assert_eq!(g.tools.len(), TOOL_SEEDS.len());
        assert_eq!(g.tools[0].term, "angled brush");
        assert_eq!(g.tools.last().unwrap().term, "stippling brush");
    }

    #[test]
    fn writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let g = build();
        let counts = g.write_to_dir(dir.path()).unwrap();
        assert_eq!(counts.0.len(), 9);

        let brands = fs::read_to_string(dir.path().join("brands.tsv")).unwrap();
        assert_eq!(brands, "KVD Beauty\nNARS\nRare Beauty\nToo Faced\nUrban Decay\n");

        let tools = fs::read_to_string(dir.path().join("tools.tsv")).unwrap();
        assert_eq!(tools.lines().next(), Some("angled brush\tangled brush\t0.9"));

        let stems = fs::read_to_string(dir.path().join("products_stems.tsv")).unwrap();
        assert_eq!(
            stems.lines().next(),
            Some("NARS\tRadiant Creamy\tConcealer\tFace\t1.0")
        );

        let patterns = fs::read_to_string(dir.path().join("tool_patterns.txt")).unwrap();
        assert_eq!(patterns.lines().count(), TOOL_PATTERNS.len());
    }

    #[test]
    fn line_terminators_per_file_kind() {
        let dir = tempfile::tempdir().unwrap();
        build().write_to_dir(dir.path()).unwrap();

        let tools = fs::read(dir.path().join("tools.tsv")).unwrap();
        assert!(tools.starts_with(b"angled brush\tangled brush\t0.9\r\n"));
        assert_eq!(tools.iter().filter(|&&b| b == b'\n').count(), TOOL_SEEDS.len());
        assert_eq!(tools.iter().filter(|&&b| b == b'\r').count(), TOOL_SEEDS.len());

        let brands = fs::read(dir.path().join("brands.tsv")).unwrap();
        assert!(!brands.contains(&b'\r'));
    }
}
