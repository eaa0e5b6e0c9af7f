use crate::api::upstream::RawResponse;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Upstream responses stay fresh for 5 minutes.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub response: RawResponse,
    pub cached_at: Instant,
}

/// URL-keyed response cache with lazy expiry.
///
/// Stale entries are never swept; they are replaced on the next miss for the
/// same URL. Concurrent misses on one key race and the last write wins.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached response for `url` if it was stored less than one
    /// TTL before `now`.
    pub fn get_fresh(&self, url: &str, now: Instant) -> Option<RawResponse> {
        let entries = self.lock();
        let entry = entries.get(url)?;
        let age = now.saturating_duration_since(entry.cached_at);
        (age < self.ttl).then(|| entry.response.clone())
    }

    pub fn insert(&self, url: &str, response: RawResponse, now: Instant) {
        self.lock().insert(
            url.to_string(),
            CacheEntry {
                response,
                cached_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic elsewhere cannot leave a half-written entry, so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}

lazy_static::lazy_static! {
    pub static ref CACHE: Arc<ResponseCache> = Arc::new(ResponseCache::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn response(body: &'static str) -> RawResponse {
        RawResponse {
            status: 200,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = ResponseCache::default();
        let start = Instant::now();
        cache.insert("https://a", response("{}"), start);

        let hit = cache.get_fresh("https://a", start + Duration::from_secs(299));
        assert_eq!(hit.map(|r| r.body), Some(Bytes::from_static(b"{}")));
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let cache = ResponseCache::default();
        let start = Instant::now();
        cache.insert("https://a", response("{}"), start);

        assert!(cache.get_fresh("https://a", start + CACHE_TTL).is_none());
        // Stale entries linger until overwritten
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites_existing_entry() {
        let cache = ResponseCache::default();
        let start = Instant::now();
        cache.insert("https://a", response("old"), start);

        let later = start + Duration::from_secs(600);
        cache.insert("https://a", response("new"), later);

        let hit = cache.get_fresh("https://a", later).map(|r| r.body);
        assert_eq!(hit, Some(Bytes::from_static(b"new")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unknown_url_misses() {
        let cache = ResponseCache::default();
        assert!(cache.is_empty());
        assert!(cache.get_fresh("https://missing", Instant::now()).is_none());
    }
}
