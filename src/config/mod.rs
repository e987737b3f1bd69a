//! Configuration loaded from `.svcmap.toml`.
//!
//! Every section is optional. Missing sections and fields fall back to the
//! conventions of go-zero projects: `.api` and `.proto` spec files, a `go.mod`
//! manifest at the project root, and a five minute cache window.

mod core;
mod loader;

pub use self::core::{
    CacheConfig, ConfigFilesConfig, FrameworkConfig, ScanConfig, SvcmapConfig,
    DEFAULT_CACHE_TTL_SECS,
};
pub use self::loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
};

/// Commented default configuration written by `svcmap init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# svcmap configuration

[scan]
# Directories pruned from the walk (hidden directories are always pruned)
skip_dirs = ["vendor", "node_modules"]
http_spec_extension = "api"
rpc_spec_extension = "proto"
manifest_file = "go.mod"

[framework]
# Substring identifying the framework among the manifest requirements
package = "go-zero"

[cache]
ttl_seconds = 300

[config_files]
conventional_names = ["etc.yaml", "etc.json"]
name_keywords = ["config", "settings"]
"#;
