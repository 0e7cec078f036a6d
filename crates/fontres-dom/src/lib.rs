//! fontres DOM - Styled document tree
//!
//! Closed node representation handed over by an external markup parser.
//! Only what font resolution needs is modelled: element tags, loosely typed
//! props (including `style`), children and primitive text leaves.

mod node;
mod json;
mod text;

pub use node::{Node, Element, Primitive, PropValue, Props};
pub use text::{text_content, decode_entities};

/// Tree construction error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported node at {path}: {message}")]
    InvalidNode { path: String, message: String },
}
