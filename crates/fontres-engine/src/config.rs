//! Engine Configuration

use std::time::Duration;

use fontres_text::{FontRequest, RangeTable};
use serde::{Deserialize, Serialize};

/// Bounded retry schedule applied to each loader in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts per loader, including the first one
    pub max_attempts: u32,

    /// Sleep before each retry; the last entry is reused when attempts
    /// outnumber delays
    pub delays_ms: Vec<u64>,
}

impl RetryPolicy {
    /// A single attempt, never sleeping
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delays_ms: Vec::new(),
        }
    }

    /// Delay before the retry following failed attempt `failed` (1-based)
    pub fn delay(&self, failed: u32) -> Duration {
        let index = (failed.max(1) - 1) as usize;
        let ms = self
            .delays_ms
            .get(index)
            .or(self.delays_ms.last())
            .copied()
            .unwrap_or(0);
        Duration::from_millis(ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delays_ms: vec![100, 200, 400],
        }
    }
}

/// What a batch does when one of its fonts cannot be resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the batch with the first error
    #[default]
    Strict,
    /// Drop failed fonts from the result
    Tolerant,
}

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry schedule per loader
    pub retry: RetryPolicy,

    /// Batch failure handling
    pub failure_policy: FailurePolicy,

    /// Unicode ranges mapped to the families that cover them
    pub unicode_ranges: RangeTable,

    /// Loaded when a document asks for no fonts at all
    pub fallback_font: Option<FontRequest>,

    /// User agent for the default network loader
    pub user_agent: String,

    /// Maximum fonts kept by the in-memory cache
    pub cache_max_entries: usize,

    /// Maximum bytes kept by the in-memory cache
    pub cache_max_bytes: usize,
}

impl Config {
    /// Parse a JSON configuration; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            failure_policy: FailurePolicy::Strict,
            unicode_ranges: RangeTable::default(),
            fallback_font: Some(FontRequest::new("Bitter").weight(600)),
            user_agent: fontres_net::LEGACY_USER_AGENT.to_string(),
            cache_max_entries: 256,
            cache_max_bytes: 64 * 1024 * 1024, // 64MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_last_delay_reused() {
        let policy = RetryPolicy {
            max_attempts: 6,
            delays_ms: vec![10, 20],
        };
        assert_eq!(policy.delay(5), Duration::from_millis(20));
        assert_eq!(RetryPolicy::none().delay(1), Duration::ZERO);
    }

    #[test]
    fn test_config_from_json() {
        let config = Config::from_json(
            r#"{
                "failure_policy": "tolerant",
                "retry": { "max_attempts": 5 },
                "unicode_ranges": [ { "ranges": ["4E00-9FFF"], "family": "Noto Sans SC" } ],
                "fallback_font": null
            }"#,
        )
        .unwrap();

        assert_eq!(config.failure_policy, FailurePolicy::Tolerant);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delays_ms, vec![100, 200, 400]);
        assert_eq!(config.unicode_ranges.len(), 1);
        assert_eq!(config.fallback_font, None);
        assert_eq!(config.cache_max_entries, 256);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fallback_font, Some(FontRequest::new("Bitter").weight(600)));
    }

    #[test]
    fn test_config_rejects_bad_policy() {
        assert!(Config::from_json(r#"{ "failure_policy": "sometimes" }"#).is_err());
    }
}
