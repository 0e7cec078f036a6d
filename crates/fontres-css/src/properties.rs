//! Font Property Parsing
//!
//! Only `font-family`, `font-weight` and `font-style` are understood.
//! Everything else in a declaration block is ignored.

use std::collections::BTreeSet;

/// Generic family keywords; these name system fonts and are never fetched
pub const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
    "emoji",
    "fangsong",
];

/// Font property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontProperty {
    Family,
    Weight,
    Style,
}

impl FontProperty {
    /// Parse a property name, accepting kebab-case and camelCase
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "font-family" | "fontFamily" => Self::Family,
            "font-weight" | "fontWeight" => Self::Weight,
            "font-style" | "fontStyle" => Self::Style,
            _ => return None,
        })
    }

    /// Attribute spellings, in lookup order
    pub fn attribute_names(self) -> [&'static str; 2] {
        match self {
            Self::Family => ["font-family", "fontFamily"],
            Self::Weight => ["font-weight", "fontWeight"],
            Self::Style => ["font-style", "fontStyle"],
        }
    }
}

/// Parsed `font-family` value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyList {
    /// Non-generic families in declaration order, quotes stripped
    pub families: Vec<String>,
    /// The subset of `families` that was written quoted
    pub quoted: BTreeSet<String>,
}

/// Check for a generic family keyword (case-insensitive)
pub fn is_generic_family(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    GENERIC_FAMILIES.contains(&lower.as_str())
}

/// Parse a comma separated `font-family` list
pub fn parse_font_family(value: &str) -> FamilyList {
    let mut list = FamilyList::default();

    for token in value.split(',').map(str::trim) {
        let (name, quoted) = match unquote(token) {
            Some(inner) => (inner, true),
            None => (token, false),
        };

        if name.is_empty() || is_generic_family(name) {
            continue;
        }

        if quoted {
            list.quoted.insert(name.to_string());
        }
        list.families.push(name.to_string());
    }

    list
}

fn unquote(token: &str) -> Option<&str> {
    if token.len() < 2 {
        return None;
    }
    ['"', '\'']
        .into_iter()
        .find(|&q| token.starts_with(q) && token.ends_with(q))
        .map(|_| &token[1..token.len() - 1])
}

/// Parse a `font-weight` value: keywords or a leading, optionally signed, integer
pub fn parse_font_weight(value: &str) -> Option<i32> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "normal" => return Some(400),
        "bold" => return Some(700),
        "lighter" => return Some(300),
        "bolder" => return Some(800),
        _ => {}
    }

    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = unsigned
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }

    // Saturate absurd values; quantization clamps them anyway
    let magnitude = digits.parse::<i32>().unwrap_or(i32::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Normalize a `font-style` value
pub fn parse_font_style(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Whether a normalized `font-style` selects an italic face
pub fn is_italic_style(style: &str) -> bool {
    matches!(style, "italic" | "oblique")
}
