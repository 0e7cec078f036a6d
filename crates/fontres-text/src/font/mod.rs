//! Font Model
//!
//! Requests, canonical weights and loaded font records.

pub mod source;

use std::fmt;

use serde::{Deserialize, Serialize};

use source::CacheKey;

/// Canonical CSS font weight (100..=900, step 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const EXTRA_LIGHT: FontWeight = FontWeight(200);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
    pub const BLACK: FontWeight = FontWeight(900);

    /// All canonical weights in ascending order
    pub const CANONICAL: [FontWeight; 9] = [
        Self::THIN,
        Self::EXTRA_LIGHT,
        Self::LIGHT,
        Self::NORMAL,
        Self::MEDIUM,
        Self::SEMI_BOLD,
        Self::BOLD,
        Self::EXTRA_BOLD,
        Self::BLACK,
    ];

    /// Quantize an arbitrary weight to the closest canonical weight.
    ///
    /// Weights are scanned in ascending order and a candidate only replaces
    /// the running best when strictly closer, so exact midpoints resolve to
    /// the lighter weight (`450 -> 400`, `650 -> 600`). NaN maps to 100.
    pub fn nearest(weight: f32) -> FontWeight {
        let mut best = Self::CANONICAL[0];
        for candidate in Self::CANONICAL {
            let distance = (candidate.0 as f32 - weight).abs();
            if distance < (best.0 as f32 - weight).abs() {
                best = candidate;
            }
        }
        best
    }

    /// Quantize an optional requested weight, defaulting to 400
    pub fn from_requested(weight: Option<u16>) -> FontWeight {
        Self::nearest(weight.unwrap_or(400) as f32)
    }

    /// Numeric value
    #[inline]
    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn from_italic(italic: bool) -> Self {
        if italic { FontStyle::Italic } else { FontStyle::Normal }
    }

    pub fn is_italic(self) -> bool {
        self == FontStyle::Italic
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A font the document needs: family plus optional weight and style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontRequest {
    pub family: String,
    #[serde(default)]
    pub weight: Option<u16>,
    #[serde(default)]
    pub italic: bool,
}

impl FontRequest {
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            weight: None,
            italic: false,
        }
    }

    /// Set the requested weight
    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Request the italic face
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Identity of this request after weight quantization
    pub fn key(&self) -> RequestKey {
        RequestKey {
            family: self.family.clone(),
            weight: FontWeight::from_requested(self.weight),
            style: FontStyle::from_italic(self.italic),
        }
    }
}

/// Deduplication and memo identity: family, canonical weight, style
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl RequestKey {
    /// Key used against a [`FontCache`](source::FontCache)
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.family, self.weight, self.style.is_italic())
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.family, self.weight, self.style)
    }
}

/// Binary font data ready for a layout engine
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFont {
    pub name: String,
    pub data: Vec<u8>,
    pub weight: Option<FontWeight>,
    pub style: Option<FontStyle>,
    pub lang: Option<String>,
}

impl LoadedFont {
    /// Wrap loaded bytes for a resolved request
    pub fn new(key: &RequestKey, data: Vec<u8>) -> Self {
        Self {
            name: key.family.clone(),
            data,
            weight: Some(key.weight),
            style: Some(key.style),
            lang: None,
        }
    }

    /// Size of the font data in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
