//! Disk-backed result cache with TTL expiry and checksum self-healing.
//!
//! One JSON file per entry, named by the derived key. Each file carries the
//! payload, its creation time, its TTL and a SHA-256 checksum of the
//! serialized payload. An entry that is expired, unreadable or fails
//! checksum verification is deleted on read and reported as a miss; cache
//! damage never surfaces to callers as an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::RunIdentity;

/// Discriminates raw-result entries from derived-summary entries so both
/// can coexist for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Raw,
    Summary,
}

impl PayloadKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Summary => "summary",
        }
    }
}

/// On-disk shape of one cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    key: String,
    payload: serde_json::Value,
    created_at: DateTime<Utc>,
    ttl_seconds: u64,
    checksum: String,
}

impl CacheEntry {
    fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_milliseconds()
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age_ms(now) > i64::try_from(self.ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
    }
}

/// Cache statistics, including process-lifetime hit/miss counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub total_bytes: u64,
    /// Age of the oldest live entry in seconds, if any entry exists.
    pub oldest_entry_age_seconds: Option<u64>,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// TTL-based disk cache for appliance results and derived summaries.
///
/// Shared across orchestrator instances via `Arc`; per-entry writes are
/// atomic (temp file + rename) so no reader ever observes a half-written
/// entry.
pub struct ResultCache {
    dir: PathBuf,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, default_ttl: Duration) -> AnalyzerResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            AnalyzerError::Cache(format!("cannot create cache dir {}: {e}", dir.display()))
        })?;
        debug!(dir = %dir.display(), ttl_secs = default_ttl.as_secs(), "opened result cache");
        Ok(Self {
            dir,
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Derive the stable cache key for a run's payload of the given kind.
    ///
    /// Identical inputs always map to the same key, across process
    /// restarts: the key hashes only the logical identity, nothing
    /// environmental.
    pub fn key_for(identity: &RunIdentity, kind: PayloadKind) -> String {
        let mut hasher = Sha256::new();
        hasher.update(identity.test_id.as_bytes());
        hasher.update([0x1f]);
        hasher.update(identity.run_id.as_bytes());
        hasher.update([0x1f]);
        hasher.update(kind.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn checksum(payload: &serde_json::Value) -> AnalyzerResult<String> {
        let bytes = serde_json::to_vec(payload)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// Look up an entry. Returns `None` on absence, expiry or corruption;
    /// the latter two delete the backing file as a side effect.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.entry_path(key);
        if !path.exists() {
            debug!(key, "cache miss: no entry");
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let entry = match self.read_entry(&path) {
            Ok(entry) => entry,
            Err(reason) => {
                warn!(key, %reason, "removing unreadable cache entry");
                self.remove_file(&path);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if entry.is_expired(Utc::now()) {
            debug!(key, ttl_seconds = entry.ttl_seconds, "cache miss: entry expired");
            self.remove_file(&path);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match Self::checksum(&entry.payload) {
            Ok(sum) if sum == entry.checksum => {
                debug!(key, "cache hit");
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.payload)
            }
            _ => {
                warn!(key, "cache checksum mismatch, discarding entry");
                self.remove_file(&path);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a payload under `key` with an explicit TTL.
    ///
    /// Writes to a temp file first and renames into place so concurrent
    /// readers either see the old entry or the complete new one.
    pub fn put(
        &self,
        key: &str,
        payload: &serde_json::Value,
        ttl: Duration,
    ) -> AnalyzerResult<()> {
        let entry = CacheEntry {
            key: key.to_string(),
            payload: payload.clone(),
            created_at: Utc::now(),
            ttl_seconds: ttl.as_secs(),
            checksum: Self::checksum(payload)?,
        };

        let path = self.entry_path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec(&entry)?;

        fs::write(&tmp, bytes).map_err(|e| {
            AnalyzerError::Cache(format!("cannot write cache entry {}: {e}", tmp.display()))
        })?;
        if let Err(e) = fs::rename(&tmp, &path) {
            // Leave no stray temp file behind on a failed rename.
            let _ = fs::remove_file(&tmp);
            return Err(AnalyzerError::Cache(format!(
                "cannot finalize cache entry {}: {e}",
                path.display()
            )));
        }

        debug!(key, ttl_secs = ttl.as_secs(), "cached entry");
        Ok(())
    }

    /// Store with the cache's default TTL.
    pub fn put_default(&self, key: &str, payload: &serde_json::Value) -> AnalyzerResult<()> {
        self.put(key, payload, self.default_ttl)
    }

    /// Delete an entry unconditionally. Deleting an absent key is not an
    /// error.
    pub fn invalidate(&self, key: &str) {
        let path = self.entry_path(key);
        if path.exists() {
            self.remove_file(&path);
            debug!(key, "invalidated cache entry");
        }
    }

    /// Delete every entry. Returns the number removed.
    pub fn clear(&self) -> usize {
        let mut count = 0;
        for path in self.entry_files() {
            if fs::remove_file(&path).is_ok() {
                count += 1;
            }
        }
        info!(count, "cleared cache");
        count
    }

    /// Delete entries older than `max_age` (default: each entry's own TTL).
    /// Unreadable entries are deleted as well. Returns the number removed.
    pub fn cleanup(&self, max_age: Option<Duration>) -> usize {
        let now = Utc::now();
        let mut count = 0;

        for path in self.entry_files() {
            let stale = match self.read_entry(&path) {
                Ok(entry) => match max_age {
                    Some(age) => {
                        entry.age_ms(now)
                            > i64::try_from(age.as_millis()).unwrap_or(i64::MAX)
                    }
                    None => entry.is_expired(now),
                },
                // Corrupt entries are as good as gone already.
                Err(_) => true,
            };

            if stale && fs::remove_file(&path).is_ok() {
                count += 1;
            }
        }

        info!(count, "cleaned up cache entries");
        count
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut entry_count = 0;
        let mut total_bytes = 0;
        let mut oldest_age_ms: Option<i64> = None;

        for path in self.entry_files() {
            entry_count += 1;
            if let Ok(meta) = fs::metadata(&path) {
                total_bytes += meta.len();
            }
            if let Ok(entry) = self.read_entry(&path) {
                let age = entry.age_ms(now);
                oldest_age_ms = Some(oldest_age_ms.map_or(age, |prev| prev.max(age)));
            }
        }

        CacheStats {
            entry_count,
            total_bytes,
            oldest_entry_age_seconds: oldest_age_ms
                .map(|ms| u64::try_from(ms / 1000).unwrap_or(0)),
            hit_count: self.hits.load(Ordering::Relaxed),
            miss_count: self.misses.load(Ordering::Relaxed),
        }
    }

    fn read_entry(&self, path: &Path) -> Result<CacheEntry, String> {
        let bytes = fs::read(path).map_err(|e| e.to_string())?;
        serde_json::from_slice(&bytes).map_err(|e| e.to_string())
    }

    fn remove_file(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove cache file");
        }
    }

    fn entry_files(&self) -> Vec<PathBuf> {
        let Ok(read_dir) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        read_dir
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_derivation_is_stable_and_kind_discriminated() {
        let id = RunIdentity::new("test-9", "run-3").unwrap();
        let a = ResultCache::key_for(&id, PayloadKind::Raw);
        let b = ResultCache::key_for(&id, PayloadKind::Raw);
        let c = ResultCache::key_for(&id, PayloadKind::Summary);

        assert_eq!(a, b);
        assert_ne!(a, c);
        // hex-encoded sha256
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn key_derivation_separates_identity_components() {
        // "ab" + "c" must not collide with "a" + "bc".
        let first = RunIdentity::new("ab", "c").unwrap();
        let second = RunIdentity::new("a", "bc").unwrap();
        assert_ne!(
            ResultCache::key_for(&first, PayloadKind::Raw),
            ResultCache::key_for(&second, PayloadKind::Raw)
        );
    }

    #[test]
    fn checksum_tracks_payload_content() {
        let a = ResultCache::checksum(&serde_json::json!({"v": 1})).unwrap();
        let b = ResultCache::checksum(&serde_json::json!({"v": 1})).unwrap();
        let c = ResultCache::checksum(&serde_json::json!({"v": 2})).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
