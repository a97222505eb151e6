//! Text normalization shared by all gazetteer outputs.

use crate::Result;
use crate::gazetteer::seeds::{STEM_MAX_TOKENS, STEM_MIN_TOKENS, STEM_STOPWORDS};
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

/// Compiled patterns for name normalization and tokenization.
pub struct Normalizer {
    whitespace: Regex,
    token: Regex,
    numeric: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            token: Regex::new(r"[A-Za-z0-9#\-/&']+")?,
            numeric: Regex::new(r"^[0-9#]+$")?,
        })
    }

    /// Trim, NFKC, collapse whitespace runs to a single space.
    pub fn norm(&self, s: &str) -> String {
        let s: String = s.trim().nfkc().collect();
        self.whitespace.replace_all(&s, " ").into_owned()
    }

    pub fn lower(&self, s: &str) -> String {
        self.norm(s).to_lowercase()
    }

    pub fn tokens(&self, s: &str) -> Vec<String> {
        self.token
            .find_iter(&self.norm(s))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Lowercased tokens of a brand name, dropped from product stems.
    pub fn brand_tokens(&self, brand: &str) -> BTreeSet<String> {
        self.tokens(brand).iter().map(|t| self.lower(t)).collect()
    }

    /// Compact stem of a product name: brand words and generic stopwords
    /// removed, "shadow stick" kept as one unit.
    pub fn build_stem(&self, product_name: &str, brand_tokens: &BTreeSet<String>) -> String {
        let tokens = self.tokens(product_name);

        let mut joined: Vec<String> = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let pair = i + 1 < tokens.len()
                && self.lower(&tokens[i]) == "shadow"
                && self.lower(&tokens[i + 1]) == "stick";
            if pair {
                joined.push("shadow stick".to_string());
                i += 2;
            } else {
                joined.push(tokens[i].clone());
                i += 1;
            }
        }

        let kept: Vec<String> = joined
            .into_iter()
            .filter(|t| {
                let t_l = self.lower(t);
                !brand_tokens.contains(&t_l) && !STEM_STOPWORDS.contains(&t_l.as_str())
            })
            .collect();

        self.norm(&kept.join(" "))
    }

    pub fn valid_stem(&self, stem: &str) -> bool {
        let parts = stem.split_whitespace().count();
        if !(STEM_MIN_TOKENS..=STEM_MAX_TOKENS).contains(&parts) {
            return false;
        }
        !self.numeric.is_match(stem)
    }

    /// Accent-folded lowercase shade name used for matching.
    pub fn norm_shade(&self, s: &str) -> String {
        let lowered = self.norm(s).to_lowercase();
        let folded: String = lowered
            .nfkd()
            .filter(|c| canonical_combining_class(*c) == 0)
            .collect();
        self.whitespace.replace_all(&folded, " ").trim().to_string()
    }
}
