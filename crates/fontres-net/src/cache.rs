//! Font Cache
//!
//! In-memory [`FontCache`] with negative entries.
//! Data entries are bounded by count and total size and evicted least
//! recently used first. Tombstones are never evicted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use fontres_text::{BoxFuture, CacheKey, CacheLookup, FontCache};

#[derive(Debug)]
enum Slot {
    Data { bytes: Vec<u8>, last_accessed: u64 },
    Tombstone,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, Slot>,
    current_size: usize,
    data_count: usize,
    /// Logical clock for LRU ordering
    tick: u64,
}

/// Bounded in-memory font cache
#[derive(Debug)]
pub struct MemoryFontCache {
    inner: Mutex<Inner>,
    max_entries: usize,
    max_size_bytes: usize,
}

impl MemoryFontCache {
    /// Create a new cache with limits
    pub fn new(max_entries: usize, max_size_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries,
            max_size_bytes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a key, refreshing its recency on a hit
    pub fn lookup(&self, key: &CacheKey) -> CacheLookup {
        let mut inner = self.lock();
        inner.tick += 1;
        let now = inner.tick;

        match inner.entries.get_mut(key) {
            Some(Slot::Data { bytes, last_accessed }) => {
                *last_accessed = now;
                CacheLookup::Hit(bytes.clone())
            }
            Some(Slot::Tombstone) => CacheLookup::Tombstone,
            None => CacheLookup::Miss,
        }
    }

    /// Store font data, replacing any previous entry for the key
    pub fn insert(&self, key: &CacheKey, bytes: Vec<u8>) {
        let size = bytes.len();
        if size > self.max_size_bytes {
            tracing::debug!("Not caching {}: {} bytes exceeds cache size", key, size);
            return;
        }

        let mut inner = self.lock();
        Self::remove_slot(&mut inner, key);

        while inner.data_count >= self.max_entries || inner.current_size + size > self.max_size_bytes {
            if !Self::evict_one(&mut inner) {
                break;
            }
        }
        if inner.data_count >= self.max_entries {
            return;
        }

        inner.tick += 1;
        let last_accessed = inner.tick;
        inner.entries.insert(key.clone(), Slot::Data { bytes, last_accessed });
        inner.current_size += size;
        inner.data_count += 1;
    }

    /// Record that a key is permanently unavailable
    pub fn mark_unavailable(&self, key: &CacheKey) {
        let mut inner = self.lock();
        Self::remove_slot(&mut inner, key);
        inner.entries.insert(key.clone(), Slot::Tombstone);
    }

    /// Check if a key has data (without updating access time)
    pub fn contains(&self, key: &CacheKey) -> bool {
        matches!(self.lock().entries.get(key), Some(Slot::Data { .. }))
    }

    /// Check if a key is tombstoned
    pub fn is_tombstoned(&self, key: &CacheKey) -> bool {
        matches!(self.lock().entries.get(key), Some(Slot::Tombstone))
    }

    /// Clear all entries, tombstones included
    pub fn clear(&self) {
        *self.lock() = Inner::default();
    }

    /// Get cache stats
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entry_count: inner.data_count,
            tombstones: inner.entries.len() - inner.data_count,
            total_size: inner.current_size,
            max_entries: self.max_entries,
            max_size: self.max_size_bytes,
        }
    }

    fn remove_slot(inner: &mut Inner, key: &CacheKey) {
        if let Some(Slot::Data { bytes, .. }) = inner.entries.remove(key) {
            inner.current_size = inner.current_size.saturating_sub(bytes.len());
            inner.data_count -= 1;
        }
    }

    /// Evict the least recently used data entry
    fn evict_one(inner: &mut Inner) -> bool {
        let oldest = inner
            .entries
            .iter()
            .filter_map(|(k, slot)| match slot {
                Slot::Data { last_accessed, .. } => Some((k, *last_accessed)),
                Slot::Tombstone => None,
            })
            .min_by_key(|(_, accessed)| *accessed)
            .map(|(k, _)| k.clone());

        match oldest {
            Some(key) => {
                tracing::debug!("Evicting {} from font cache", key);
                Self::remove_slot(inner, &key);
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryFontCache {
    fn default() -> Self {
        Self::new(256, 64 * 1024 * 1024) // 256 fonts, 64MB
    }
}

impl FontCache for MemoryFontCache {
    fn get<'a>(&'a self, key: &'a CacheKey) -> BoxFuture<'a, CacheLookup> {
        Box::pin(async move { self.lookup(key) })
    }

    fn put<'a>(&'a self, key: &'a CacheKey, data: &'a [u8]) -> BoxFuture<'a, ()> {
        Box::pin(async move { self.insert(key, data.to_vec()) })
    }

    fn supports_tombstones(&self) -> bool {
        true
    }

    fn tombstone<'a>(&'a self, key: &'a CacheKey) -> BoxFuture<'a, ()> {
        Box::pin(async move { self.mark_unavailable(key) })
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub tombstones: usize,
    pub total_size: usize,
    pub max_entries: usize,
    pub max_size: usize,
}

impl CacheStats {
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.total_size as f64 / self.max_size as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontres_text::FontWeight;

    fn key(family: &str) -> CacheKey {
        CacheKey::new(family, FontWeight::NORMAL, false)
    }

    #[test]
    fn test_cache_basic() {
        let cache = MemoryFontCache::new(10, 1024);
        cache.insert(&key("Inter"), b"font".to_vec());

        assert!(cache.contains(&key("Inter")));
        assert_eq!(cache.lookup(&key("Inter")), CacheLookup::Hit(b"font".to_vec()));
        assert_eq!(cache.lookup(&key("Lora")), CacheLookup::Miss);
    }

    #[test]
    fn test_italic_keys_are_distinct() {
        let cache = MemoryFontCache::new(10, 1024);
        cache.insert(&CacheKey::new("Inter", FontWeight::NORMAL, true), b"i".to_vec());

        assert_eq!(cache.lookup(&key("Inter")), CacheLookup::Miss);
    }

    #[test]
    fn test_tombstone() {
        let cache = MemoryFontCache::new(10, 1024);
        cache.insert(&key("Gone"), b"data".to_vec());
        cache.mark_unavailable(&key("Gone"));

        assert_eq!(cache.lookup(&key("Gone")), CacheLookup::Tombstone);
        assert!(cache.is_tombstoned(&key("Gone")));

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.tombstones, 1);
        assert_eq!(stats.total_size, 0);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = MemoryFontCache::new(2, 1024);
        cache.insert(&key("A"), b"a".to_vec());
        cache.insert(&key("B"), b"b".to_vec());

        // Touch A so B becomes least recently used
        cache.lookup(&key("A"));
        cache.insert(&key("C"), b"c".to_vec());

        assert!(cache.contains(&key("A")));
        assert!(!cache.contains(&key("B")));
        assert!(cache.contains(&key("C")));
    }

    #[test]
    fn test_size_limit() {
        let cache = MemoryFontCache::new(100, 10);
        cache.insert(&key("small"), b"12345".to_vec());
        assert!(cache.contains(&key("small")));

        cache.insert(&key("huge"), b"123456789012".to_vec());
        assert!(!cache.contains(&key("huge")));

        cache.insert(&key("fits"), b"123456".to_vec());
        assert!(cache.contains(&key("fits")));
        assert!(!cache.contains(&key("small")));
        assert_eq!(cache.stats().total_size, 6);
    }

    #[test]
    fn test_replace_updates_size() {
        let cache = MemoryFontCache::new(10, 1024);
        cache.insert(&key("A"), vec![0; 10]);
        cache.insert(&key("A"), vec![0; 4]);

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.total_size, 4);
    }

    #[test]
    fn test_tombstones_survive_eviction() {
        let cache = MemoryFontCache::new(1, 1024);
        cache.mark_unavailable(&key("Gone"));
        cache.insert(&key("A"), b"a".to_vec());
        cache.insert(&key("B"), b"b".to_vec());

        assert!(cache.is_tombstoned(&key("Gone")));
        assert!(cache.contains(&key("B")));
    }

    #[test]
    fn test_clear_and_utilization() {
        let cache = MemoryFontCache::new(10, 100);
        cache.insert(&key("A"), vec![0; 25]);
        assert!((cache.stats().utilization() - 0.25).abs() < f64::EPSILON);

        cache.clear();
        assert_eq!(cache.stats().entry_count, 0);
        assert_eq!(cache.stats().utilization(), 0.0);
    }

    #[test]
    fn test_trait_roundtrip() {
        let cache = MemoryFontCache::default();
        assert!(cache.supports_tombstones());

        smol::block_on(async {
            cache.put(&key("Inter"), b"bytes").await;
            assert_eq!(cache.get(&key("Inter")).await, CacheLookup::Hit(b"bytes".to_vec()));

            cache.tombstone(&key("Inter")).await;
            assert_eq!(cache.get(&key("Inter")).await, CacheLookup::Tombstone);
        });
    }
}
