//! fontres Networking
//!
//! Default font sources and caches:
//! - [`GoogleFontLoader`]: fetches TrueType binaries from Google Fonts
//! - [`MemoryFontCache`]: bounded in-process cache with tombstones

mod google;
mod cache;

pub use google::{GoogleFontLoader, extract_font_url, is_missing_family, CSS_API, LEGACY_USER_AGENT};
pub use cache::{MemoryFontCache, CacheStats};
pub use url::Url;

/// Network error
///
/// Never escapes a loader: every variant is reported as a transient outcome.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid font data: {0}")]
    InvalidFont(String),
}
