//! Request aggregation
//!
//! Combines cascade and coverage requests into one list keyed by
//! family, canonical weight and style.

use std::collections::HashSet;

use fontres_css::{extract_font_requests, CssError};
use fontres_dom::{text_content, Node};
use fontres_text::{scan_coverage, FontRequest, RangeTable};

/// Merge two request lists, keeping the first request seen for each key.
///
/// Cascade requests come first, so a coverage request never replaces one.
pub fn merge_requests(cascade: Vec<FontRequest>, coverage: Vec<FontRequest>) -> Vec<FontRequest> {
    let mut seen = HashSet::new();
    cascade
        .into_iter()
        .chain(coverage)
        .filter(|request| seen.insert(request.key()))
        .collect()
}

/// Every font a tree needs: declared families plus script coverage
pub fn collect_font_requests(tree: &Node, ranges: &RangeTable) -> Result<Vec<FontRequest>, CssError> {
    let cascade = extract_font_requests(tree)?;

    let coverage = if ranges.is_empty() {
        Vec::new()
    } else {
        scan_coverage(&text_content(tree), ranges)
    };

    let requests = merge_requests(cascade, coverage);
    tracing::debug!("Collected {} font requests", requests.len());
    Ok(requests)
}
