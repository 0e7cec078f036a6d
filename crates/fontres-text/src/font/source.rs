//! Font Sources
//!
//! Contracts for pluggable font loaders and font caches. Both are
//! object-safe so callers can compose heterogeneous chains behind `Arc<dyn _>`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use super::FontWeight;

/// Boxed, sendable future returned by loaders and caches
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a loader is asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadParams {
    pub family: String,
    pub weight: FontWeight,
    pub italic: bool,
    /// Restrict the font to these characters, when the source supports subsetting
    pub text: Option<String>,
}

impl LoadParams {
    pub fn new(family: &str, weight: FontWeight, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
            text: None,
        }
    }
}

/// Result of a single load attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Font bytes
    Loaded(Vec<u8>),
    /// The source definitively does not have this font; never retried
    NotFound,
    /// Retryable failure (network error, rate limit, malformed response)
    Transient(String),
}

/// A source of font binaries
pub trait FontLoader: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str {
        "loader"
    }

    /// Attempt to load one font
    fn load<'a>(&'a self, params: &'a LoadParams) -> BoxFuture<'a, LoadOutcome>;
}

/// Cache identity: family (suffixed with `:ital` for italics) and weight
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub family: String,
    pub weight: FontWeight,
}

impl CacheKey {
    pub fn new(family: &str, weight: FontWeight, italic: bool) -> Self {
        let family = if italic {
            format!("{}:ital", family)
        } else {
            family.to_string()
        };
        Self { family, weight }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.family, self.weight)
    }
}

/// Cache lookup result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(Vec<u8>),
    /// Every loader was exhausted for this key; treat as permanently unavailable
    Tombstone,
    Miss,
}

/// Persistent or shared store of previously loaded fonts
pub trait FontCache: Send + Sync {
    fn get<'a>(&'a self, key: &'a CacheKey) -> BoxFuture<'a, CacheLookup>;

    fn put<'a>(&'a self, key: &'a CacheKey, data: &'a [u8]) -> BoxFuture<'a, ()>;

    /// Whether [`tombstone`](FontCache::tombstone) records negative entries
    fn supports_tombstones(&self) -> bool {
        false
    }

    /// Mark a key as permanently unavailable
    fn tombstone<'a>(&'a self, _key: &'a CacheKey) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }
}
