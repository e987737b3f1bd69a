//! Entry point combining the scanner with the analysis cache.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use svcmap::{AnalysisCache, ProjectAnalyzer, TreeScanner};
//!
//! let cache = Arc::new(AnalysisCache::default());
//! let analyzer = ProjectAnalyzer::new(TreeScanner::default(), cache);
//!
//! let outcome = analyzer.analyze(Path::new("./shop"))?;
//! println!(
//!     "{} services (cached: {})",
//!     outcome.analysis.summary().total_services,
//!     outcome.from_cache
//! );
//! # Ok::<(), svcmap::errors::Error>(())
//! ```

use crate::cache::AnalysisCache;
use crate::core::ProjectAnalysis;
use crate::errors::Result;
use crate::scanner::{resolve_project_path, TreeScanner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Result of [`ProjectAnalyzer::analyze`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub analysis: ProjectAnalysis,
    /// True when the analysis was served from the cache
    pub from_cache: bool,
}

/// Runs scans on the caller's thread and memoizes them in a shared cache.
///
/// Two analyzers sharing one cache may scan the same path at the same time;
/// both scans run and the later one's result replaces the earlier.
pub struct ProjectAnalyzer {
    scanner: TreeScanner,
    cache: Arc<AnalysisCache>,
}

impl ProjectAnalyzer {
    pub fn new(scanner: TreeScanner, cache: Arc<AnalysisCache>) -> Self {
        Self { scanner, cache }
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }

    /// Analyze the project at `path`, reusing a fresh cached result if present.
    ///
    /// A relative path is resolved against the current directory and an empty
    /// path means the current directory itself.
    pub fn analyze(&self, path: &Path) -> Result<AnalysisOutcome> {
        let project_path = resolve_project_path(&effective_path(path))?;

        if let Some(analysis) = self.cache.get(&project_path) {
            debug!(path = %project_path.display(), "Serving analysis from cache");
            return Ok(AnalysisOutcome {
                analysis,
                from_cache: true,
            });
        }

        let analysis = self.scanner.scan(&project_path)?;
        self.cache.put(&project_path, analysis.clone());

        Ok(AnalysisOutcome {
            analysis,
            from_cache: false,
        })
    }
}

fn effective_path(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path.to_path_buf()
    }
}
