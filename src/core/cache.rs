// time-bounded response cache
// exact (role, prompt, context) key, no normalization, no size bound

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::core::manager::GenerateResponse;

pub const CACHE_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    response: GenerateResponse,
    expires_at: Instant,
}

/// Memoizes provider responses for a fixed TTL. Expiry is checked on read,
/// so an expired entry is never returned; entries are only removed by TTL,
/// never by size pressure.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<GenerateResponse> {
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.response.clone()),
            Some(_) => {
                // stale, drop it on the way out
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, response: GenerateResponse) {
        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            CacheEntry {
                response,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CACHE_TTL)
    }
}
