//! Time-bounded, in-memory memoization of project analyses.

pub mod analysis_cache;

pub use analysis_cache::{AnalysisCache, CacheEntry, CacheStats, DEFAULT_TTL};
