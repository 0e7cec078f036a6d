//! Unicode Coverage
//!
//! Infers which fonts are needed to render scripts outside Basic Latin.
//! The range table is ordered: the first entry covering a code point wins.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{FontRequest, RangeError};

/// Code points below this are assumed covered by any font
pub const BASE_RANGE_END: u32 = 0x0080;

/// Ranges (`"4E00-9FFF"`, hex, inclusive) mapped to one family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnicodeRangeFamily {
    pub ranges: Vec<String>,
    pub family: String,
}

/// Ordered range table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    entries: Vec<UnicodeRangeFamily>,
}

impl RangeTable {
    pub fn new(entries: Vec<UnicodeRangeFamily>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of `{ "ranges": [..], "family": ".." }`
    pub fn from_json(json: &str) -> Result<Self, RangeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append an entry
    pub fn with(mut self, ranges: &[&str], family: &str) -> Self {
        self.entries.push(UnicodeRangeFamily {
            ranges: ranges.iter().map(|r| r.to_string()).collect(),
            family: family.to_string(),
        });
        self
    }

    pub fn entries(&self) -> &[UnicodeRangeFamily] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn compile(&self) -> Vec<(Vec<(u32, u32)>, &str)> {
        self.entries
            .iter()
            .map(|entry| {
                let ranges = entry
                    .ranges
                    .iter()
                    .filter_map(|raw| {
                        let parsed = parse_unicode_range(raw);
                        if parsed.is_none() {
                            tracing::warn!("Ignoring invalid unicode range {:?} for {}", raw, entry.family);
                        }
                        parsed
                    })
                    .collect();
                (ranges, entry.family.as_str())
            })
            .collect()
    }
}

/// Parse `"<hexStart>-<hexEnd>"` into an inclusive pair
pub fn parse_unicode_range(range: &str) -> Option<(u32, u32)> {
    let (start, end) = range.split_once('-')?;
    if end.contains('-') {
        return None;
    }
    let start = u32::from_str_radix(start.trim(), 16).ok()?;
    let end = u32::from_str_radix(end.trim(), 16).ok()?;
    (start <= end).then_some((start, end))
}

/// Families required by the non-Latin code points of `text`, in first-seen order.
///
/// Each returned request has weight 400 and is upright.
pub fn scan_coverage(text: &str, table: &RangeTable) -> Vec<FontRequest> {
    if table.is_empty() {
        return Vec::new();
    }

    let compiled = table.compile();
    let mut registered: HashSet<&str> = HashSet::new();
    let mut found = Vec::new();

    for ch in text.chars() {
        let cp = ch as u32;
        if cp < BASE_RANGE_END {
            continue;
        }

        let hit = compiled
            .iter()
            .find(|(ranges, _)| ranges.iter().any(|&(start, end)| cp >= start && cp <= end));

        if let Some(&(_, family)) = hit {
            if registered.insert(family) {
                tracing::debug!("U+{:04X} requires {}", cp, family);
                found.push(FontRequest::new(family).weight(400));
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cjk_table() -> RangeTable {
        RangeTable::default()
            .with(&["4E00-9FFF", "3400-4DBF"], "Noto Sans SC")
            .with(&["0600-06FF"], "Noto Sans Arabic")
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_unicode_range("4E00-9FFF"), Some((0x4E00, 0x9FFF)));
        assert_eq!(parse_unicode_range("2F800-2FA1F"), Some((0x2F800, 0x2FA1F)));
        assert_eq!(parse_unicode_range("00a0-00ff"), Some((0xA0, 0xFF)));
    }

    #[test]
    fn test_parse_range_invalid() {
        assert_eq!(parse_unicode_range("4E00"), None);
        assert_eq!(parse_unicode_range("4E00-9FFF-A000"), None);
        assert_eq!(parse_unicode_range("XYZ-9FFF"), None);
        assert_eq!(parse_unicode_range("9FFF-4E00"), None);
    }

    #[test]
    fn test_scan_cjk() {
        let found = scan_coverage("Hello 中文", &cjk_table());
        assert_eq!(found, vec![FontRequest::new("Noto Sans SC").weight(400)]);
    }

    #[test]
    fn test_scan_ascii_only() {
        assert!(scan_coverage("Hello, world! 123", &cjk_table()).is_empty());
    }

    #[test]
    fn test_scan_first_seen_order() {
        let found = scan_coverage("مرحبا 中 عربي 文", &cjk_table());
        let families: Vec<_> = found.iter().map(|f| f.family.as_str()).collect();
        assert_eq!(families, vec!["Noto Sans Arabic", "Noto Sans SC"]);
    }

    #[test]
    fn test_scan_first_entry_wins() {
        let table = RangeTable::default()
            .with(&["4E00-4EFF"], "First")
            .with(&["4E00-9FFF"], "Second");

        let found = scan_coverage("\u{4E2D}", &table);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].family, "First");

        let found = scan_coverage("\u{4E2D}\u{5000}", &table);
        let families: Vec<_> = found.iter().map(|f| f.family.as_str()).collect();
        assert_eq!(families, vec!["First", "Second"]);
    }

    #[test]
    fn test_scan_counts_code_points_not_units() {
        let table = RangeTable::default().with(&["1F300-1F5FF"], "Noto Emoji");
        let found = scan_coverage("Hello 🌎", &table);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].family, "Noto Emoji");
    }

    #[test]
    fn test_scan_skips_invalid_ranges() {
        let table = RangeTable::default().with(&["bogus", "00C0-00FF"], "Latin Ext");
        let found = scan_coverage("café", &table);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_table_from_json() {
        let table = RangeTable::from_json(
            r#"[{ "ranges": ["4E00-9FFF"], "family": "Noto Sans SC" }]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].family, "Noto Sans SC");

        assert!(RangeTable::from_json(r#"{ "ranges": [] }"#).is_err());
    }
}
