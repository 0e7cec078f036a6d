//! Font Resolver
//!
//! Turns [`FontRequest`]s into [`LoadedFont`]s. Each request goes through:
//!
//! 1. the resolver's memo (every font this resolver has produced)
//! 2. the optional [`FontCache`], where a tombstone fails immediately
//! 3. the loader chain, each loader retried per the [`RetryPolicy`]
//!
//! When every loader is exhausted the key is tombstoned (if the cache
//! supports it) so later lookups fail without touching the network.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fontres_net::GoogleFontLoader;
use fontres_text::{CacheLookup, FontCache, FontLoader, FontRequest, LoadOutcome, LoadParams, LoadedFont, RequestKey};

use crate::retry::{load_with_retry, Sleeper, TimerSleeper};
use crate::{FailurePolicy, RetryPolicy};

/// Font resolution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The cache holds a tombstone for this font
    #[error("Font unavailable: {key}")]
    Unavailable { key: RequestKey },

    /// Every loader in the chain failed
    #[error("Font loading exhausted: {key}")]
    Exhausted { key: RequestKey },
}

impl ResolveError {
    pub fn key(&self) -> &RequestKey {
        match self {
            ResolveError::Unavailable { key } | ResolveError::Exhausted { key } => key,
        }
    }
}

struct Inner {
    cache: Option<Arc<dyn FontCache>>,
    loaders: Vec<Arc<dyn FontLoader>>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    memo: Mutex<HashMap<RequestKey, Arc<LoadedFont>>>,
}

/// Resolves font requests against a cache and a loader chain.
///
/// Cloning is cheap and clones share the memo, so a font is loaded at most
/// once for the lifetime of a resolver and all of its clones.
#[derive(Clone)]
pub struct FontResolver {
    inner: Arc<Inner>,
}

impl FontResolver {
    pub fn builder() -> FontResolverBuilder {
        FontResolverBuilder::default()
    }

    /// Names of the configured loaders, in chain order
    pub fn loader_names(&self) -> Vec<String> {
        self.inner.loaders.iter().map(|l| l.name().to_string()).collect()
    }

    /// Number of memoized fonts
    pub fn memoized_count(&self) -> usize {
        self.memo().len()
    }

    fn memo(&self) -> MutexGuard<'_, HashMap<RequestKey, Arc<LoadedFont>>> {
        self.inner.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember(&self, key: &RequestKey, data: Vec<u8>) -> Arc<LoadedFont> {
        let font = Arc::new(LoadedFont::new(key, data));
        self.memo().insert(key.clone(), Arc::clone(&font));
        font
    }

    /// Resolve a single request
    pub async fn resolve_one(&self, request: &FontRequest) -> Result<Arc<LoadedFont>, ResolveError> {
        let key = request.key();

        let memoized = self.memo().get(&key).cloned();
        if let Some(font) = memoized {
            tracing::debug!("Memo hit: {}", key);
            return Ok(font);
        }

        let cache_key = key.cache_key();
        if let Some(cache) = &self.inner.cache {
            match cache.get(&cache_key).await {
                CacheLookup::Hit(data) => {
                    tracing::debug!("Cache hit: {}", cache_key);
                    return Ok(self.remember(&key, data));
                }
                CacheLookup::Tombstone => {
                    tracing::debug!("Tombstoned: {}", cache_key);
                    return Err(ResolveError::Unavailable { key });
                }
                CacheLookup::Miss => {}
            }
        }

        let params = LoadParams::new(&key.family, key.weight, key.style.is_italic());
        for loader in &self.inner.loaders {
            let outcome = load_with_retry(
                loader.as_ref(),
                &params,
                &self.inner.retry,
                self.inner.sleeper.as_ref(),
            )
            .await;

            if let LoadOutcome::Loaded(data) = outcome {
                tracing::info!("Loaded {} ({} bytes) from {}", key, data.len(), loader.name());
                if let Some(cache) = &self.inner.cache {
                    cache.put(&cache_key, &data).await;
                }
                return Ok(self.remember(&key, data));
            }
        }

        if let Some(cache) = &self.inner.cache {
            if cache.supports_tombstones() {
                tracing::warn!("Tombstoning {}", cache_key);
                cache.tombstone(&cache_key).await;
            }
        }
        Err(ResolveError::Exhausted { key })
    }

    /// Resolve a batch concurrently.
    ///
    /// Equivalent requests are resolved once. Results follow the order of
    /// first occurrence. Under [`FailurePolicy::Strict`] the first failure
    /// (in that order) is returned and the remaining tasks keep running in
    /// the background; under [`FailurePolicy::Tolerant`] failures are
    /// left out of the result.
    pub async fn resolve_many(
        &self,
        requests: &[FontRequest],
        policy: FailurePolicy,
    ) -> Result<Vec<Arc<LoadedFont>>, ResolveError> {
        let mut seen = HashSet::new();
        let tasks: Vec<_> = requests
            .iter()
            .filter(|request| seen.insert(request.key()))
            .map(|request| {
                let resolver = self.clone();
                let request = request.clone();
                smol::spawn(async move { resolver.resolve_one(&request).await })
            })
            .collect();

        let total = tasks.len();
        let mut fonts = Vec::with_capacity(total);
        let mut tasks = tasks.into_iter();

        while let Some(task) = tasks.next() {
            match task.await {
                Ok(font) => fonts.push(font),
                Err(e) => match policy {
                    FailurePolicy::Strict => {
                        tasks.for_each(|task| task.detach());
                        return Err(e);
                    }
                    FailurePolicy::Tolerant => {
                        tracing::warn!("Skipping font: {}", e);
                    }
                },
            }
        }

        tracing::info!("Resolved {}/{} fonts", fonts.len(), total);
        Ok(fonts)
    }
}

/// Builder for [`FontResolver`]
#[derive(Default)]
pub struct FontResolverBuilder {
    cache: Option<Arc<dyn FontCache>>,
    loaders: Vec<Arc<dyn FontLoader>>,
    retry: RetryPolicy,
    sleeper: Option<Arc<dyn Sleeper>>,
    user_agent: Option<String>,
}

impl FontResolverBuilder {
    /// Shared cache consulted before any loader
    pub fn cache(mut self, cache: Arc<dyn FontCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Append a loader to the chain
    pub fn loader(mut self, loader: Arc<dyn FontLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the timer used for backoff
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// User agent for the default loader
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Build the resolver. Without loaders the chain is the Google Fonts loader.
    pub fn build(self) -> FontResolver {
        let mut loaders = self.loaders;
        if loaders.is_empty() {
            let mut google = GoogleFontLoader::new();
            if let Some(user_agent) = &self.user_agent {
                google = google.user_agent(user_agent);
            }
            loaders.push(Arc::new(google));
        }

        FontResolver {
            inner: Arc::new(Inner {
                cache: self.cache,
                loaders,
                retry: self.retry,
                sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TimerSleeper)),
                memo: Mutex::new(HashMap::new()),
            }),
        }
    }
}
