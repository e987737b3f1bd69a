use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scanner::ScanOptions;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Root configuration structure for svcmap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SvcmapConfig {
    /// Directory walk and file discovery settings
    #[serde(default)]
    pub scan: Option<ScanConfig>,

    /// Hosting framework detection
    #[serde(default)]
    pub framework: Option<FrameworkConfig>,

    /// Analysis cache settings
    #[serde(default)]
    pub cache: Option<CacheConfig>,

    /// Configuration file naming heuristics
    #[serde(default)]
    pub config_files: Option<ConfigFilesConfig>,
}

impl SvcmapConfig {
    /// Scanner options with defaults filled in for every missing section.
    pub fn scan_options(&self) -> ScanOptions {
        let scan = self.scan.clone().unwrap_or_default();
        let config_files = self.config_files.clone().unwrap_or_default();
        let framework = self.framework.clone().unwrap_or_default();

        ScanOptions {
            skip_dirs: scan.skip_dirs,
            http_spec_extension: scan.http_spec_extension,
            rpc_spec_extension: scan.rpc_spec_extension,
            manifest_file: scan.manifest_file,
            framework_package: framework.package,
            config_name_keywords: config_files.name_keywords,
            config_conventional_names: config_files.conventional_names,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        let secs = self
            .cache
            .as_ref()
            .map_or(DEFAULT_CACHE_TTL_SECS, |c| c.ttl_seconds);
        Duration::from_secs(secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory names pruned from the walk, in addition to hidden ones
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    #[serde(default = "default_http_spec_extension")]
    pub http_spec_extension: String,

    #[serde(default = "default_rpc_spec_extension")]
    pub rpc_spec_extension: String,

    /// Manifest file name looked up at the project root
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_dirs: default_skip_dirs(),
            http_spec_extension: default_http_spec_extension(),
            rpc_spec_extension: default_rpc_spec_extension(),
            manifest_file: default_manifest_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameworkConfig {
    /// Substring of the framework's package path
    #[serde(default = "default_framework_package")]
    pub package: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            package: default_framework_package(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFilesConfig {
    /// File names always treated as configuration
    #[serde(default = "default_conventional_names")]
    pub conventional_names: Vec<String>,

    /// Keywords that mark a file name as configuration
    #[serde(default = "default_name_keywords")]
    pub name_keywords: Vec<String>,
}

impl Default for ConfigFilesConfig {
    fn default() -> Self {
        Self {
            conventional_names: default_conventional_names(),
            name_keywords: default_name_keywords(),
        }
    }
}

pub fn default_skip_dirs() -> Vec<String> {
    vec!["vendor".to_string(), "node_modules".to_string()]
}

pub fn default_http_spec_extension() -> String {
    "api".to_string()
}

pub fn default_rpc_spec_extension() -> String {
    "proto".to_string()
}

pub fn default_manifest_file() -> String {
    "go.mod".to_string()
}

pub fn default_framework_package() -> String {
    "go-zero".to_string()
}

pub fn default_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

pub fn default_conventional_names() -> Vec<String> {
    vec!["etc.yaml".to_string(), "etc.json".to_string()]
}

pub fn default_name_keywords() -> Vec<String> {
    vec!["config".to_string(), "settings".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SvcmapConfig::default();
        let options = config.scan_options();

        assert_eq!(options.skip_dirs, vec!["vendor", "node_modules"]);
        assert_eq!(options.manifest_file, "go.mod");
        assert_eq!(options.framework_package, "go-zero");
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_section_fills_missing_fields() {
        let config: SvcmapConfig =
            toml::from_str("[scan]\nskip_dirs = [\"third_party\"]\n").unwrap();
        let options = config.scan_options();

        assert_eq!(options.skip_dirs, vec!["third_party"]);
        assert_eq!(options.http_spec_extension, "api");
        assert_eq!(options.rpc_spec_extension, "proto");
    }
}
