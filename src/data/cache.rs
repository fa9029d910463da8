//! On-disk cache for upstream GET responses.
//!
//! One JSON file per key. The key is the full request URL (query string
//! included) and the file name is a hash of that key. An entry is served only
//! while it is younger than the configured time-to-live; anything stale,
//! unreadable, or belonging to a different URL (hash collision) is a miss.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

/// A cached response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { dir: dir.into(), ttl }
    }

    /// File that stores the entry for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        self.dir.join(format!("{:016x}.json", hasher.finish()))
    }

    /// Fresh body for `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let path = self.path_for(key);
        let raw = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(path = %path.display(), "ignoring unreadable cache entry: {e}");
                return None;
            }
        };
        if entry.url != key {
            return None;
        }

        let age = now.signed_duration_since(entry.fetched_at);
        let ttl = chrono::Duration::from_std(self.ttl).ok()?;
        if age < chrono::Duration::zero() || age >= ttl {
            return None;
        }
        Some(entry.body)
    }

    pub fn put(&self, key: &str, body: &str) -> Result<(), AppError> {
        self.put_at(key, body, Utc::now())
    }

    pub fn put_at(&self, key: &str, body: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;
        let entry = CacheEntry {
            url: key.to_string(),
            fetched_at: now,
            body: body.to_string(),
        };
        let path = self.path_for(key);
        // Write-then-rename so a concurrent reader never sees half a file.
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::now_v7()));
        fs::write(&tmp, serde_json::to_vec(&entry)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://archive.example/v1/archive?latitude=1&longitude=2";

    #[test]
    fn fresh_entry_is_served_until_ttl_expires() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::from_secs(3600));
        let t0 = Utc::now();

        cache.put_at(URL, "{\"ok\":true}", t0).unwrap();

        let hit = cache.get_at(URL, t0 + chrono::Duration::seconds(10));
        assert_eq!(hit.as_deref(), Some("{\"ok\":true}"));

        let stale = cache.get_at(URL, t0 + chrono::Duration::seconds(3600));
        assert!(stale.is_none());
    }

    #[test]
    fn key_includes_query_string() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::from_secs(60));
        let now = Utc::now();

        cache.put_at(URL, "a", now).unwrap();
        let other = format!("{URL}&hourly=temperature_2m");

        assert!(cache.get_at(&other, now).is_none());
        assert_ne!(cache.path_for(URL), cache.path_for(&other));
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::from_secs(60));
        std::fs::write(cache.path_for(URL), "not json").unwrap();

        assert!(cache.get(URL).is_none());
    }

    #[test]
    fn zero_ttl_never_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::ZERO);
        let now = Utc::now();
        cache.put_at(URL, "a", now).unwrap();

        assert!(cache.get_at(URL, now).is_none());
    }
}
