//! Project tree scanner.
//!
//! [`TreeScanner::scan`] walks a project directory once, parses every spec
//! document it finds, records configuration files, reads the manifest at the
//! project root and assembles a [`ProjectAnalysis`].
//!
//! Hidden directories and the configured vendored directories are pruned from
//! the walk entirely, at any depth. Per-file problems never abort a scan: an
//! unreadable or unparseable spec document is left out of the service list and
//! reported in [`ProjectAnalysis::skipped`] instead.

pub mod classify;

use crate::config::SvcmapConfig;
use crate::core::{
    ConfigFile, ManifestFacts, ProjectAnalysis, ServiceInfo, ServiceKind, SkippedFile,
};
use crate::errors::{Error, Result};
use crate::extraction::{extract_http_spec, extract_rpc_spec, ManifestParser};
use classify::{classify, FileClass};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, info, info_span, warn};
use walkdir::{DirEntry, WalkDir};

pub use classify::{matching_config_rule, ConfigNameRule, CONFIG_NAME_RULES};

/// Settings controlling discovery and classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names pruned from the walk, in addition to hidden ones
    pub skip_dirs: Vec<String>,
    pub http_spec_extension: String,
    pub rpc_spec_extension: String,
    /// Manifest file name at the project root
    pub manifest_file: String,
    /// Substring identifying the framework among manifest requirements
    pub framework_package: String,
    pub config_name_keywords: Vec<String>,
    pub config_conventional_names: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        SvcmapConfig::default().scan_options()
    }
}

/// Resolve `path` to an absolute, canonical directory.
///
/// Fails with [`Error::PathNotFound`] when nothing exists at `path` and with
/// [`Error::NotADirectory`] when it names a file.
pub fn resolve_project_path(path: &Path) -> Result<PathBuf> {
    let canonical = fs::canonicalize(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;

    if !canonical.is_dir() {
        return Err(Error::NotADirectory { path: canonical });
    }
    Ok(canonical)
}

pub struct TreeScanner {
    options: ScanOptions,
    manifest_parser: ManifestParser,
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl TreeScanner {
    pub fn new(options: ScanOptions) -> Self {
        let manifest_parser = ManifestParser::new(options.framework_package.clone());
        Self {
            options,
            manifest_parser,
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan the project rooted at `root`.
    pub fn scan(&self, root: &Path) -> Result<ProjectAnalysis> {
        let root = resolve_project_path(root)?;
        let _span = info_span!("scan_project", root = %root.display()).entered();

        let mut services = Vec::new();
        let mut configs = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping directory entry: {}", err);
                    continue;
                }
            };
            if !is_file_entry(&entry) {
                continue;
            }

            let path = entry.path();
            match classify(path, &self.options) {
                Some(FileClass::HttpSpec) => {
                    self.collect_service(path, ServiceKind::Http, &mut services, &mut skipped)
                }
                Some(FileClass::RpcSpec) => {
                    self.collect_service(path, ServiceKind::Rpc, &mut services, &mut skipped)
                }
                Some(FileClass::Config(format)) => configs.push(ConfigFile {
                    path: path.to_path_buf(),
                    format,
                }),
                None => {}
            }
        }

        let manifest = self.read_manifest(&root, &mut skipped);
        let analysis = ProjectAnalysis::new(root, services, manifest, configs, skipped);

        info!(
            services = analysis.summary().total_services,
            dependencies = analysis.summary().total_dependencies,
            configs = analysis.configs().len(),
            skipped = analysis.skipped().len(),
            "Project scan complete"
        );
        Ok(analysis)
    }

    /// Whether `entry` is a directory whose whole subtree is left out.
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.options.skip_dirs.iter().any(|d| d.as_str() == name)
    }

    fn collect_service(
        &self,
        path: &Path,
        kind: ServiceKind,
        services: &mut Vec<ServiceInfo>,
        skipped: &mut Vec<SkippedFile>,
    ) {
        let _span = debug_span!("spec_file", path = %path.display(), kind = %kind).entered();

        match parse_spec(path, kind) {
            Ok(service) => {
                debug!(name = %service.name, "Parsed spec document");
                services.push(service);
            }
            Err(reason) => {
                debug!(%reason, "Skipping spec document");
                skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason,
                });
            }
        }
    }

    fn read_manifest(&self, root: &Path, skipped: &mut Vec<SkippedFile>) -> ManifestFacts {
        let manifest_path = root.join(&self.options.manifest_file);
        if !manifest_path.is_file() {
            debug!(path = %manifest_path.display(), "No dependency manifest");
            return ManifestFacts::default();
        }

        match self.manifest_parser.parse_file(&manifest_path) {
            Ok(manifest) => manifest.into(),
            Err(err) => {
                warn!("{}", err);
                skipped.push(SkippedFile {
                    path: manifest_path,
                    reason: err.to_string(),
                });
                ManifestFacts::default()
            }
        }
    }
}

/// Regular files, and symlinks whose target is a regular file.
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn parse_spec(path: &Path, kind: ServiceKind) -> std::result::Result<ServiceInfo, String> {
    let bytes = fs::read(path).map_err(|e| format!("failed to read spec document: {}", e))?;
    let content = String::from_utf8_lossy(&bytes);

    let service = match kind {
        ServiceKind::Http => extract_http_spec(&content).map(|spec| spec.into_service(path)),
        ServiceKind::Rpc => extract_rpc_spec(&content).map(|spec| spec.into_service(path)),
    };
    service.map_err(|e| e.to_string())
}
