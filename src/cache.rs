//! In-Memory TTL Cache
//!
//! JSON values keyed by string, each with its own time-to-live and a hit
//! counter. The size of an entry is estimated as two bytes per UTF-16 code
//! unit of its serialized JSON; when the running total would pass `max_size`,
//! expired entries are dropped and then the least-hit entries are evicted.

use std::collections::HashMap;
use std::future::Future;

use serde_json::Value;

/// Millisecond clock, injected so expiry can be tested
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    data: Value,
    timestamp: u64,
    ttl: u64,
    hits: u64,
    size: usize,
}

impl CacheEntry {
    fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl
    }
}

fn estimate_size(data: &Value) -> usize {
    data.to_string().encode_utf16().count() * 2
}

#[derive(Clone, Debug, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub percent_full: f64,
    pub entries: usize,
    pub total_hits: u64,
    /// Average hits per entry
    pub hit_rate: f64,
}

pub struct TtlCache<C: Clock = SystemClock> {
    entries: HashMap<String, CacheEntry>,
    size: usize,
    max_size: usize,
    default_ttl: u64,
    clock: C,
}

impl TtlCache<SystemClock> {
    pub fn new(default_ttl_ms: u64, max_size: usize) -> Self {
        Self::with_clock(default_ttl_ms, max_size, SystemClock)
    }
}

impl<C: Clock> TtlCache<C> {
    pub fn with_clock(default_ttl_ms: u64, max_size: usize, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            size: 0,
            max_size,
            default_ttl: default_ttl_ms,
            clock,
        }
    }

    /// Fresh value for `key`; an expired entry is removed
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        let expired = self.entries.get(key)?.is_expired(now);
        if expired {
            self.delete(key);
            return None;
        }
        let entry = self.entries.get_mut(key)?;
        entry.hits += 1;
        log::debug!("[Cache] hit {}", key);
        Some(entry.data.clone())
    }

    pub fn set(&mut self, key: &str, data: Value, ttl_ms: Option<u64>) {
        let size = estimate_size(&data);
        if self.size + size > self.max_size {
            self.cleanup();
        }
        if let Some(old) = self.entries.remove(key) {
            self.size -= old.size;
        }
        let ttl = ttl_ms.unwrap_or(self.default_ttl);
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                timestamp: self.clock.now_ms(),
                ttl,
                hits: 0,
                size,
            },
        );
        self.size += size;
        log::debug!("[Cache] stored {} (ttl {}ms)", key, ttl);
    }

    pub fn delete(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.size -= entry.size;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired(now) => {
                self.delete(key);
                false
            }
            Some(_) => true,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Drop expired entries, then evict the least-hit entries once the cache
    /// is over 80% full, until it is back under 70%.
    pub fn cleanup(&mut self) {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        let before_size = self.size;

        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.size = self.entries.values().map(|e| e.size).sum();

        if self.size as f64 > self.max_size as f64 * 0.8 {
            let mut by_hits: Vec<(String, u64)> = self
                .entries
                .iter()
                .map(|(k, e)| (k.clone(), e.hits))
                .collect();
            by_hits.sort_by_key(|(_, hits)| *hits);

            let target = self.max_size as f64 * 0.7;
            for (key, _) in by_hits {
                if self.size as f64 <= target {
                    break;
                }
                self.delete(&key);
            }
        }

        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!(
                "[Cache] cleanup removed {} entries, freed {} bytes",
                removed,
                before_size - self.size
            );
        }
    }

    /// Cached value, or the result of `fetch` stored under `key`
    pub async fn get_or_fetch<F, Fut, E>(&mut self, key: &str, fetch: F, ttl_ms: Option<u64>) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }
        log::debug!("[Cache] miss {}, fetching", key);
        let data = fetch().await?;
        self.set(key, data.clone(), ttl_ms);
        Ok(data)
    }

    /// Synchronous memoization
    pub fn get_or_insert_with<F>(&mut self, key: &str, compute: F, ttl_ms: Option<u64>) -> Value
    where
        F: FnOnce() -> Value,
    {
        if let Some(cached) = self.get(key) {
            return cached;
        }
        let data = compute();
        self.set(key, data.clone(), ttl_ms);
        data
    }

    /// Remove every key the predicate accepts; returns how many were removed
    pub fn invalidate_by_pattern(&mut self, matches: impl Fn(&str) -> bool) -> usize {
        let doomed: Vec<String> = self.entries.keys().filter(|k| matches(k)).cloned().collect();
        for key in &doomed {
            self.delete(key);
        }
        log::debug!("[Cache] invalidated {} entries", doomed.len());
        doomed.len()
    }

    pub fn stats(&self) -> CacheStats {
        let total_hits: u64 = self.entries.values().map(|e| e.hits).sum();
        let entries = self.entries.len();
        CacheStats {
            size: self.size,
            max_size: self.max_size,
            percent_full: if self.max_size == 0 {
                0.0
            } else {
                self.size as f64 * 100.0 / self.max_size as f64
            },
            entries,
            total_hits,
            hit_rate: if total_hits > 0 {
                total_hits as f64 / entries as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeClock(Rc<Cell<u64>>);

    impl FakeClock {
        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    fn cache(max: usize) -> (TtlCache<FakeClock>, FakeClock) {
        let clock = FakeClock::default();
        (TtlCache::with_clock(1000, max, clock.clone()), clock)
    }

    #[test]
    fn test_get_counts_hits_and_expires() {
        let (mut c, clock) = cache(10_000);
        c.set("a", json!("x"), None);
        assert_eq!(c.get("a"), Some(json!("x")));
        assert_eq!(c.stats().total_hits, 1);

        clock.advance(1000);
        assert!(c.has("a"));
        clock.advance(1);
        assert_eq!(c.get("a"), None);
        assert!(c.keys().is_empty());
        assert_eq!(c.stats().size, 0);
    }

    #[test]
    fn test_replacing_key_subtracts_old_size() {
        let (mut c, _) = cache(10_000);
        c.set("a", json!("abcd"), None); // "\"abcd\"" = 6 chars
        assert_eq!(c.stats().size, 12);
        c.set("a", json!("ab"), None);
        assert_eq!(c.stats().size, 8);
        assert_eq!(c.stats().entries, 1);
    }

    #[test]
    fn test_size_counts_utf16_units() {
        let (mut c, _) = cache(10_000);
        // astral char is a surrogate pair
        c.set("emoji", json!("😀"), None);
        assert_eq!(c.stats().size, 8);
        c.set("hebrew", json!("שלום"), None);
        assert_eq!(c.stats().size, 8 + 12);
    }

    #[test]
    fn test_cleanup_evicts_least_hit_first() {
        // each "aaaa" entry is 12 bytes
        let (mut c, _) = cache(40);
        c.set("cold", json!("aaaa"), None);
        c.set("warm", json!("aaaa"), None);
        c.set("hot", json!("aaaa"), None);
        c.get("warm");
        c.get("hot");
        c.get("hot");

        // 36 + 12 > 40, cleanup runs: 36 > 32 so evict until <= 28
        c.set("new", json!("aaaa"), None);

        assert!(!c.has("cold"));
        assert!(c.has("warm"));
        assert!(c.has("hot"));
        assert!(c.has("new"));
        assert_eq!(c.stats().size, 36);
    }

    #[test]
    fn test_cleanup_drops_expired_before_evicting() {
        let (mut c, clock) = cache(40);
        c.set("short", json!("aaaa"), Some(10));
        c.set("long", json!("aaaa"), None);
        clock.advance(11);
        c.cleanup();
        assert_eq!(c.keys(), vec!["long".to_string()]);
    }

    #[test]
    fn test_invalidate_by_pattern() {
        let (mut c, _) = cache(10_000);
        c.set("items:1", json!(1), None);
        c.set("items:2", json!(2), None);
        c.set("users", json!(3), None);
        assert_eq!(c.invalidate_by_pattern(|k| k.starts_with("items")), 2);
        assert_eq!(c.keys(), vec!["users".to_string()]);
    }

    #[test]
    fn test_get_or_insert_with_memoizes() {
        let (mut c, _) = cache(10_000);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            json!([1, 2])
        };
        assert_eq!(c.get_or_insert_with("k", compute, None), json!([1, 2]));
        assert_eq!(c.get_or_insert_with("k", || json!(null), None), json!([1, 2]));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch() {
        let (mut c, _) = cache(10_000);
        let v: Result<Value, ()> = c.get_or_fetch("k", || async { Ok(json!({"a": 1})) }, None).await;
        assert_eq!(v, Ok(json!({"a": 1})));
        let v: Result<Value, ()> = c.get_or_fetch("k", || async { Err(()) }, None).await;
        assert_eq!(v, Ok(json!({"a": 1})));
    }

    #[test]
    fn test_stats() {
        let (mut c, _) = cache(100);
        c.set("a", json!(1), None);
        c.set("b", json!(2), None);
        c.get("a");
        c.get("a");
        let s = c.stats();
        assert_eq!(s.entries, 2);
        assert_eq!(s.size, 4);
        assert_eq!(s.percent_full, 4.0);
        assert_eq!(s.hit_rate, 1.0);
    }
}
