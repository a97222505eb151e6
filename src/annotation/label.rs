//! Closed entity label set.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Brand,
    Product,
    Shade,
    Tool,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Brand, Label::Product, Label::Shade, Label::Tool];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Brand => "BRAND",
            Label::Product => "PRODUCT",
            Label::Shade => "SHADE",
            Label::Tool => "TOOL",
        }
    }

    /// Exact, case-sensitive match against the tag set.
    pub fn parse(s: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|l| l.as_str() == s)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label {0:?}")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::parse(s).ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
