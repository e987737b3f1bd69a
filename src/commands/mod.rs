//! CLI command implementations.
//!
//! - **analyze**: map a project's services, dependencies and configuration files
//! - **serve**: answer analysis requests from stdin with one cache for the session
//! - **init**: write a default `.svcmap.toml`

pub mod analyze;
pub mod init;
pub mod serve;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
pub use serve::{handle_serve, serve_requests, ServeConfig};
