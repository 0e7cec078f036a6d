//! fontres Engine
//!
//! Resolves the font binaries a styled document tree needs.
//!
//! # Pipeline
//! - Style cascade: quoted `font-family` names in force at each element
//! - Unicode coverage: families for scripts outside Basic Latin
//! - Aggregation: one request per family, canonical weight and style
//! - Resolution: memo, cache, then a chain of loaders with retry/backoff
//!
//! # Example
//! ```rust,ignore
//! use fontres_engine::{Engine, Config};
//!
//! let engine = Engine::new(Config::default());
//! let fonts = smol::block_on(engine.load_fonts_json(tree_json))?;
//! ```

mod aggregate;
mod config;
mod engine;
mod resolver;
pub mod retry;

pub use aggregate::{collect_font_requests, merge_requests};
pub use config::{Config, FailurePolicy, RetryPolicy};
pub use engine::{Engine, EngineError};
pub use resolver::{FontResolver, FontResolverBuilder, ResolveError};
pub use retry::{Sleeper, TimerSleeper};

// Re-export sub-crates for advanced usage
pub use fontres_css as css;
pub use fontres_dom as dom;
pub use fontres_net as net;
pub use fontres_text as text;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
