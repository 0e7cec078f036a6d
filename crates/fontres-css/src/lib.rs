//! fontres CSS - Font style cascade
//!
//! Extracts the fonts a styled document tree asks for. This is not a general
//! CSS engine: only `font-family`, `font-weight` and `font-style` are read,
//! from font attributes and inline `style` values.

pub mod properties;
mod computed;
mod cascade;

pub use computed::{ComputedStyle, split_declarations};
pub use cascade::{CascadeResolver, element_style, extract_font_requests};
pub use properties::{FamilyList, FontProperty, GENERIC_FAMILIES};

/// Style extraction error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Malformed style on <{tag}>: style must be a string or a mapping, found {found}")]
    MalformedStyle { tag: String, found: &'static str },
}
