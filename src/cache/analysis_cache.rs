use crate::core::ProjectAnalysis;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Default freshness window for cached analyses
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cached analysis for one project path
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub analysis: ProjectAnalysis,
    pub created_at: Instant,
}

impl CacheEntry {
    fn new(analysis: ProjectAnalysis) -> Self {
        Self {
            analysis,
            created_at: Instant::now(),
        }
    }

    /// Fresh while its age is strictly below `ttl`.
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries physically present, expired ones included
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// In-memory, per-process cache of project analyses.
///
/// One lock guards the whole table. Entries are replaced wholesale on every
/// `put` and never removed, so the table holds one entry per distinct project
/// path seen during the process lifetime. Concurrent scans of the same path
/// are not de-duplicated; the last `put` wins.
#[derive(Debug)]
pub struct AnalysisCache {
    ttl: Duration,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Copy of the cached analysis for `path` if one exists and is still fresh.
    pub fn get(&self, path: &Path) -> Option<ProjectAnalysis> {
        let key = cache_key(path);
        let now = Instant::now();

        let found = self
            .entries
            .read()
            .get(&key)
            .filter(|entry| entry.is_fresh(self.ttl, now))
            .map(|entry| entry.analysis.clone());

        match found {
            Some(analysis) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("Analysis cache hit for {}", key.display());
                Some(analysis)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                log::debug!("Analysis cache miss for {}", key.display());
                None
            }
        }
    }

    /// Store `analysis` for `path`, replacing any previous entry.
    pub fn put(&self, path: &Path, analysis: ProjectAnalysis) {
        let key = cache_key(path);
        self.entries.write().insert(key, CacheEntry::new(analysis));
    }

    /// Number of entries in the table, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Canonical absolute form of `path`, or `path` itself when it cannot be resolved.
fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
