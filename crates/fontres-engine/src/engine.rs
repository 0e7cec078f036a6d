//! Engine - Main entry point

use std::sync::Arc;

use fontres_dom::Node;
use fontres_net::MemoryFontCache;
use fontres_text::{FontRequest, LoadedFont};

use crate::{collect_font_requests, Config, FontResolver, ResolveError};

/// Resolves the fonts documents need
pub struct Engine {
    config: Config,
    resolver: FontResolver,
}

impl Engine {
    /// Create an engine with an in-memory cache and the default loader
    pub fn new(config: Config) -> Self {
        let cache = MemoryFontCache::new(config.cache_max_entries, config.cache_max_bytes);
        let resolver = FontResolver::builder()
            .cache(Arc::new(cache))
            .retry(config.retry.clone())
            .user_agent(&config.user_agent)
            .build();
        Self::with_resolver(config, resolver)
    }

    /// Create an engine from a JSON configuration
    pub fn from_config_json(json: &str) -> Result<Self, EngineError> {
        Ok(Self::new(Config::from_json(json)?))
    }

    /// Create an engine around an existing resolver
    pub fn with_resolver(config: Config, resolver: FontResolver) -> Self {
        tracing::info!("fontres {} initialized", crate::VERSION);
        Self { config, resolver }
    }

    /// Fonts the tree asks for, or the fallback font when it asks for none
    pub fn font_requests(&self, tree: &Node) -> Result<Vec<FontRequest>, EngineError> {
        let requests = collect_font_requests(tree, &self.config.unicode_ranges)?;
        if !requests.is_empty() {
            return Ok(requests);
        }

        match &self.config.fallback_font {
            Some(fallback) => {
                tracing::debug!("No fonts requested, using fallback {}", fallback.family);
                Ok(vec![fallback.clone()])
            }
            None => Ok(requests),
        }
    }

    /// Resolve every font a tree needs under the configured failure policy
    pub async fn load_fonts(&self, tree: &Node) -> Result<Vec<Arc<LoadedFont>>, EngineError> {
        let requests = self.font_requests(tree)?;
        let fonts = self
            .resolver
            .resolve_many(&requests, self.config.failure_policy)
            .await?;
        Ok(fonts)
    }

    /// [`load_fonts`](Self::load_fonts) for a JSON tree
    pub async fn load_fonts_json(&self, json: &str) -> Result<Vec<Arc<LoadedFont>>, EngineError> {
        let tree = Node::from_json(json)?;
        self.load_fonts(&tree).await
    }

    /// Get engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &FontResolver {
        &self.resolver
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Tree error: {0}")]
    Tree(#[from] fontres_dom::DomError),

    #[error("Style error: {0}")]
    Style(#[from] fontres_css::CssError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_no_fonts() {
        let engine = Engine::new(Config::default());
        let requests = engine.font_requests(&Node::element("div").child(Node::text("plain"))).unwrap();
        assert_eq!(requests, vec![FontRequest::new("Bitter").weight(600)]);
    }

    #[test]
    fn test_no_fallback() {
        let config = Config {
            fallback_font: None,
            ..Config::default()
        };
        let engine = Engine::new(config);
        assert!(engine.font_requests(&Node::text("plain")).unwrap().is_empty());
    }

    #[test]
    fn test_declared_fonts_skip_fallback() {
        let engine = Engine::default();
        let tree = Node::element("p").style("font-family: 'Lora'; font-weight: bold");
        assert_eq!(
            engine.font_requests(&tree).unwrap(),
            vec![FontRequest::new("Lora").weight(700)]
        );
    }

    #[test]
    fn test_from_config_json() {
        let engine = Engine::from_config_json(r#"{ "failure_policy": "tolerant" }"#).unwrap();
        assert_eq!(engine.config().failure_policy, crate::FailurePolicy::Tolerant);

        let err = Engine::from_config_json("[").err().unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_default_engine_uses_google() {
        let engine = Engine::default();
        assert_eq!(engine.resolver().loader_names(), vec!["google-fonts".to_string()]);
    }
}
