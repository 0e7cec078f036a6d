//! fontres Text
//!
//! Font data model shared by every stage of the pipeline:
//!
//! - [`FontWeight`] quantization to the nine canonical CSS weights
//! - [`FontRequest`] / [`LoadedFont`] records
//! - the pluggable [`FontLoader`] and [`FontCache`] contracts
//! - Unicode coverage scanning over configured range tables

pub mod font;
pub mod coverage;

pub use font::{FontWeight, FontStyle, FontRequest, RequestKey, LoadedFont};
pub use font::source::{
    BoxFuture, CacheKey, CacheLookup, FontCache, FontLoader, LoadOutcome, LoadParams,
};
pub use coverage::{scan_coverage, parse_unicode_range, RangeTable, UnicodeRangeFamily};

/// Range configuration error
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    #[error("Invalid range table: {0}")]
    Json(#[from] serde_json::Error),
}
