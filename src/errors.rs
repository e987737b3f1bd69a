//! Shared error types for the analyzer

use crate::core::ServiceKind;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for svcmap operations
#[derive(Debug, Error)]
pub enum Error {
    /// Scan target does not exist
    #[error("project path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// Scan target exists but is a file
    #[error("project path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Spec document has no recognizable service block
    #[error("no {kind} declared in specification")]
    NoServiceDeclared { kind: ServiceKind },

    /// Manifest exists but could not be read
    #[error("failed to read dependency manifest {}: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Path the error refers to, when there is one
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PathNotFound { path }
            | Self::NotADirectory { path }
            | Self::ManifestUnreadable { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_errors_name_the_path() {
        let err = Error::NotADirectory {
            path: PathBuf::from("/tmp/go.mod"),
        };
        assert_eq!(
            err.to_string(),
            "project path is not a directory: /tmp/go.mod"
        );
        assert_eq!(err.path(), Some(&PathBuf::from("/tmp/go.mod")));
    }

    #[test]
    fn test_no_service_message_names_kind() {
        let err = Error::NoServiceDeclared {
            kind: ServiceKind::Rpc,
        };
        assert_eq!(err.to_string(), "no rpc service declared in specification");
        assert!(err.path().is_none());
    }
}
