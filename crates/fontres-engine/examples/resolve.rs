//! Example: resolve the fonts of a JSON document tree
//!
//! ```text
//! RUST_LOG=fontres_engine=debug cargo run --example resolve -- tree.json [config.json]
//! ```
//!
//! Without arguments a small built-in tree is used.

use anyhow::Context;
use fontres_engine::dom::Node;
use fontres_engine::{Config, Engine};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"{
  "type": "div",
  "props": {
    "style": { "fontFamily": "'Sour Gummy', sans-serif", "fontWeight": 600 },
    "children": [
      "Hello 🌎",
      { "type": "em", "props": { "style": "font-style: italic", "children": "world" } }
    ]
  }
}"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);

    let tree_json = match args.next() {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?,
        None => SAMPLE.to_string(),
    };
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            Config::from_json(&json).context("parsing config")?
        }
        None => Config::default(),
    };

    let tree = Node::from_json(&tree_json).context("parsing tree")?;
    let engine = Engine::new(config);

    println!("fontres v{}", fontres_engine::VERSION);
    for request in engine.font_requests(&tree)? {
        println!("  requested: {} {:?} italic={}", request.family, request.weight, request.italic);
    }

    let fonts = smol::block_on(engine.load_fonts(&tree))?;
    for font in &fonts {
        println!(
            "  loaded: {} {} {} ({} bytes)",
            font.name,
            font.weight.unwrap_or_default(),
            font.style.unwrap_or_default(),
            font.len()
        );
    }

    Ok(())
}
