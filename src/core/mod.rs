//! Data model produced by a project scan.
//!
//! A [`ProjectAnalysis`] is built once per scan and never mutated afterwards.
//! Its [`Summary`] is always derived from the lists it summarizes through
//! [`Summary::from_parts`], so the counters cannot drift from the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of service declared by a spec document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    #[serde(rename = "http-service")]
    Http,
    #[serde(rename = "rpc-service")]
    Rpc,
}

impl ServiceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceKind::Http => "api",
            ServiceKind::Rpc => "rpc",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Http => write!(f, "http service"),
            ServiceKind::Rpc => write!(f, "rpc service"),
        }
    }
}

/// One HTTP route declared in a service block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Upper-cased HTTP verb
    pub method: String,
    /// Route pattern, parameter segments are prefixed with `:`
    pub path: String,
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Which sides of a remote method carry a stream of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamDirection {
    #[default]
    None,
    Request,
    Response,
    Bidirectional,
}

impl StreamDirection {
    /// Combine the streaming flags of the request and response sides.
    pub fn from_sides(request_streams: bool, response_streams: bool) -> Self {
        match (request_streams, response_streams) {
            (false, false) => StreamDirection::None,
            (true, false) => StreamDirection::Request,
            (false, true) => StreamDirection::Response,
            (true, true) => StreamDirection::Bidirectional,
        }
    }

    pub fn is_streaming(&self) -> bool {
        !matches!(self, StreamDirection::None)
    }
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamDirection::None => "none",
            StreamDirection::Request => "request",
            StreamDirection::Response => "response",
            StreamDirection::Bidirectional => "bidirectional",
        };
        write!(f, "{}", s)
    }
}

/// One remote method declared in a service block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcMethod {
    pub name: String,
    pub request: String,
    pub response: String,
    pub stream: StreamDirection,
}

/// A service discovered from one spec document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub kind: ServiceKind,
    /// Directory containing the spec document
    pub path: PathBuf,
    pub spec_file: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpc_methods: Vec<RpcMethod>,
}

impl ServiceInfo {
    pub fn http(name: String, spec_file: &Path, endpoints: Vec<Endpoint>) -> Self {
        Self {
            name,
            kind: ServiceKind::Http,
            path: containing_dir(spec_file),
            spec_file: spec_file.to_path_buf(),
            endpoints,
            rpc_methods: Vec::new(),
        }
    }

    pub fn rpc(name: String, spec_file: &Path, rpc_methods: Vec<RpcMethod>) -> Self {
        Self {
            name,
            kind: ServiceKind::Rpc,
            path: containing_dir(spec_file),
            spec_file: spec_file.to_path_buf(),
            endpoints: Vec::new(),
            rpc_methods,
        }
    }
}

fn containing_dir(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Direct,
    Indirect,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Direct => write!(f, "direct"),
            DependencyKind::Indirect => write!(f, "indirect"),
        }
    }
}

/// A requirement declared in the dependency manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Raw version text following the `v` prefix, not semver-validated
    pub version: String,
    pub kind: DependencyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        static EXTENSION_MAP: &[(&[&str], ConfigFormat)] = &[
            (&["yaml", "yml"], ConfigFormat::Yaml),
            (&["json"], ConfigFormat::Json),
            (&["toml"], ConfigFormat::Toml),
        ];

        let ext = ext.to_ascii_lowercase();
        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext.as_str()))
            .map(|(_, format)| *format)
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => write!(f, "yaml"),
            ConfigFormat::Json => write!(f, "json"),
            ConfigFormat::Toml => write!(f, "toml"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
}

/// A spec document the scan found but could not turn into a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Counters derived from the lists of a [`ProjectAnalysis`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_services: usize,
    pub http_services: usize,
    pub rpc_services: usize,
    pub total_endpoints: usize,
    pub total_rpc_methods: usize,
    pub total_dependencies: usize,
    /// Empty when the framework is not among the dependencies
    pub framework_version: String,
}

impl Summary {
    /// Reduce the analysis lists into counters.
    pub fn from_parts(
        services: &[ServiceInfo],
        dependencies: &[Dependency],
        framework_version: Option<&str>,
    ) -> Self {
        let count_kind =
            |kind: ServiceKind| services.iter().filter(|s| s.kind == kind).count();

        Self {
            total_services: services.len(),
            http_services: count_kind(ServiceKind::Http),
            rpc_services: count_kind(ServiceKind::Rpc),
            total_endpoints: services.iter().map(|s| s.endpoints.len()).sum(),
            total_rpc_methods: services.iter().map(|s| s.rpc_methods.len()).sum(),
            total_dependencies: dependencies.len(),
            framework_version: framework_version.unwrap_or_default().to_string(),
        }
    }
}

/// Facts taken from the dependency manifest at the project root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFacts {
    pub module: Option<String>,
    pub dependencies: Vec<Dependency>,
    pub framework_version: Option<String>,
}

/// Complete result of scanning one project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    project_path: PathBuf,
    module: Option<String>,
    services: Vec<ServiceInfo>,
    dependencies: Vec<Dependency>,
    configs: Vec<ConfigFile>,
    skipped: Vec<SkippedFile>,
    summary: Summary,
    scanned_at: DateTime<Utc>,
}

impl ProjectAnalysis {
    pub fn new(
        project_path: PathBuf,
        services: Vec<ServiceInfo>,
        manifest: ManifestFacts,
        configs: Vec<ConfigFile>,
        skipped: Vec<SkippedFile>,
    ) -> Self {
        let summary = Summary::from_parts(
            &services,
            &manifest.dependencies,
            manifest.framework_version.as_deref(),
        );

        Self {
            project_path,
            module: manifest.module,
            services,
            dependencies: manifest.dependencies,
            configs,
            skipped,
            summary,
            scanned_at: Utc::now(),
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Module path declared in the manifest, if any
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn services(&self) -> &[ServiceInfo] {
        &self.services
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn configs(&self) -> &[ConfigFile] {
        &self.configs
    }

    /// Spec documents excluded from `services`, with the reason
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    pub fn services_of(&self, kind: ServiceKind) -> impl Iterator<Item = &ServiceInfo> {
        self.services.iter().filter(move |s| s.kind == kind)
    }

    pub fn direct_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies
            .iter()
            .filter(|d| d.kind == DependencyKind::Direct)
    }
}
