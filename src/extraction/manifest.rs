//! Line-oriented parser for `go.mod` style dependency manifests.

use crate::core::{Dependency, DependencyKind, ManifestFacts};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// `<name> v<version>` at the start of a requirement line.
static REQUIREMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([a-zA-Z0-9\-._/]+)\s+v([0-9.\-+a-zA-Z]+)").unwrap());

const REQUIRE_KEYWORD: &str = "require";
const BLOCK_OPEN: &str = "(";
const BLOCK_CLOSE: &str = ")";
const INDIRECT_MARKER: &str = "// indirect";

/// Parsed contents of a dependency manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Path from the `module` declaration
    pub module: Option<String>,
    /// Toolchain version from the `go` directive
    pub go_version: Option<String>,
    /// Requirements in document order
    pub dependencies: Vec<Dependency>,
    /// Version of the first dependency naming the framework package
    pub framework_version: Option<String>,
}

impl From<Manifest> for ManifestFacts {
    fn from(manifest: Manifest) -> Self {
        ManifestFacts {
            module: manifest.module,
            dependencies: manifest.dependencies,
            framework_version: manifest.framework_version,
        }
    }
}

/// Parses manifests and spots the hosting framework among the requirements
#[derive(Debug, Clone)]
pub struct ManifestParser {
    framework_package: String,
}

impl ManifestParser {
    pub fn new(framework_package: impl Into<String>) -> Self {
        Self {
            framework_package: framework_package.into(),
        }
    }

    /// Read and parse the manifest at `path`.
    ///
    /// Any read failure, including a missing file, is reported as
    /// [`Error::ManifestUnreadable`]; callers that tolerate absence check first.
    /// Bytes that are not valid UTF-8 are replaced, not rejected.
    pub fn parse_file(&self, path: &Path) -> Result<Manifest> {
        let bytes = std::fs::read(path).map_err(|source| Error::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn parse(&self, content: &str) -> Manifest {
        let mut manifest = Manifest::default();
        let mut in_require_block = false;

        for line in content.lines().map(str::trim) {
            if in_require_block {
                if line == BLOCK_CLOSE {
                    in_require_block = false;
                } else {
                    self.push_requirement(&mut manifest, line);
                }
                continue;
            }

            if let Some(rest) = keyword_argument(line, REQUIRE_KEYWORD) {
                if rest == BLOCK_OPEN {
                    in_require_block = true;
                } else {
                    self.push_requirement(&mut manifest, rest);
                }
            } else if let Some(rest) = keyword_argument(line, "module") {
                manifest.module = first_token(rest);
            } else if let Some(rest) = keyword_argument(line, "go") {
                manifest.go_version = first_token(rest);
            }
        }

        manifest
    }

    fn push_requirement(&self, manifest: &mut Manifest, line: &str) {
        let Some(caps) = REQUIREMENT.captures(line) else {
            return;
        };

        let kind = if line.contains(INDIRECT_MARKER) {
            DependencyKind::Indirect
        } else {
            DependencyKind::Direct
        };
        let dependency = Dependency {
            name: caps[1].to_string(),
            version: caps[2].to_string(),
            kind,
        };

        if manifest.framework_version.is_none() && dependency.name.contains(&self.framework_package)
        {
            manifest.framework_version = Some(dependency.version.clone());
        }
        manifest.dependencies.push(dependency);
    }
}

/// Text after `keyword` when the line starts with it as a whole word.
fn keyword_argument<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) || rest.starts_with(BLOCK_OPEN) {
        Some(rest.trim())
    } else {
        None
    }
}

fn first_token(text: &str) -> Option<String> {
    text.split_whitespace()
        .next()
        .map(|token| token.trim_matches('"').to_string())
}
