//! Static analysis of go-zero microservice projects.
//!
//! Walks a project tree, extracts HTTP services from `.api` specs and RPC
//! services from `.proto` specs, reads dependencies from `go.mod` and lists
//! configuration files. Results are memoized per project path for a bounded
//! time window.

pub mod analyzer;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod scanner;

// Re-export commonly used types
pub use crate::analyzer::{AnalysisOutcome, ProjectAnalyzer};
pub use crate::cache::{AnalysisCache, CacheStats};
pub use crate::core::{
    ConfigFile, ConfigFormat, Dependency, DependencyKind, Endpoint, ManifestFacts,
    ProjectAnalysis, RpcMethod, ServiceInfo, ServiceKind, SkippedFile, StreamDirection, Summary,
};
pub use crate::errors::{Error, Result};
pub use crate::extraction::{
    extract_http_spec, extract_rpc_spec, HttpSpec, Manifest, ManifestParser, RpcSpec,
};
pub use crate::scanner::{ScanOptions, TreeScanner};
