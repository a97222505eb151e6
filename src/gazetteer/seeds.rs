//! Hand-curated seeds. Edit here, not in the builder.

/// alias -> (canonical brand, priority)
pub const BRAND_ALIAS_SEEDS: &[(&str, &str, f64)] = &[
    ("CT", "Charlotte Tilbury", 0.6),
    ("Tilbury", "Charlotte Tilbury", 0.8),
    ("ABH", "Anastasia Beverly Hills", 0.9),
    ("Kat Von D", "KVD Beauty", 1.0),
    ("UD", "Urban Decay", 0.7),
    ("RB", "Rare Beauty", 0.7),
    // common misspellings
    ("Bobby Brown", "Bobbi Brown", 1.0),
    ("two-faced", "Too Faced", 1.0),
];

/// Last-token aliases are never derived from these generic words.
pub const GENERIC_BRAND_TOKENS: &[&str] = &["beauty", "cosmetics", "makeup"];

/// Priority given to derived last-token aliases.
pub const LAST_TOKEN_ALIAS_PRIORITY: f64 = 0.7;

// "shadow" and "stick" are deliberately absent: "shadow stick" is kept as one unit.
pub const STEM_STOPWORDS: &[&str] = &[
    "the", "a", "an", "by", "for", "of", "and", "with", "to", "in", "on", "at", "all", "over",
    "face", "skin", "powder", "foundation", "concealer", "mascara", "eyeliner", "liner", "brow",
    "blush", "bronzer", "contour", "palette", "eyeshadow", "spray", "mist", "setting", "lip",
    "oil", "pencil", "cream", "liquid", "gel", "primer", "tint", "tinted", "moisturizer",
    "highlighter", "highlight", "pressed", "loose", "translucent", "compact", "glow", "matte",
    "dewy", "waterproof", "volumizing", "lengthening",
];

pub const STEM_MIN_TOKENS: usize = 2;
pub const STEM_MAX_TOKENS: usize = 5;

/// Stems containing one of these phrases are down-weighted.
pub const GENERIC_STEM_PHRASES: &[&str] = &[
    "tinted moisturizer",
    "foundation",
    "powder",
    "palette",
    "lip oil",
    "lip gloss",
];
pub const GENERIC_STEM_WEIGHT: f64 = 0.7;
pub const STEM_WEIGHT: f64 = 1.0;

/// (surface term, canonical tool, weight)
pub const TOOL_SEEDS: &[(&str, &str, f64)] = &[
    ("beauty blender", "beauty blender", 1.0),
    ("sponge", "sponge", 0.8),
    ("powder puff", "powder puff", 0.8),
    ("kabuki brush", "kabuki brush", 1.0),
    ("stippling brush", "stippling brush", 1.0),
    ("angled brush", "angled brush", 0.9),
    ("crease brush", "crease brush", 0.9),
    ("blending brush", "blending brush", 0.9),
    ("brow brush", "brow brush", 0.9),
    ("spoolie", "spoolie", 1.0),
    ("eyelash curler", "eyelash curler", 0.9),
];

pub const SHADE_PATTERNS: &[&str] = &[
    r"\b(NC|NW)\s*\d{1,3}\b",
    r"\b\d{2,3}[A-Z]?\b",
    r"\b#\s?\d{2,3}\b",
    r"\b\d{1,2}(N|W|C|Y|R)\b",
];

pub const TOOL_PATTERNS: &[&str] = &[r"\b(M|E)\d{2,4}\b", r"\b(217|239|221|224|201)\b"];

pub const STOP_PHRASES: &[&str] = &[
    "a bit of",
    "gonna",
    "i'm going to",
    "like a",
    "sort of",
    "this is",
    "we are going to",
    "you guys",
];
