//! Error taxonomy for locale asset resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by filter hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the i18n module.
pub type Result<T> = std::result::Result<T, LocaleError>;

/// Errors raised while reading language assets.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The requested path escapes the language assets root.
    #[error("[[error:invalid-path]] {path} is outside the language root")]
    InvalidPath {
        /// Path that failed the containment check.
        path: PathBuf,
    },

    /// The expected asset file does not exist.
    #[error("language asset not found: {path}")]
    NotFound {
        /// Path that was read.
        path: PathBuf,
    },

    /// The asset file exists but is not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Any other read failure.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The namespace filter hook rejected the data.
    #[error("filter hook failed for {language}/{namespace}: {source}")]
    Filter {
        language: String,
        namespace: String,
        #[source]
        source: BoxError,
    },
}

impl LocaleError {
    /// Classify an I/O error by kind. Absence maps to `NotFound`.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LocaleError::NotFound { path }
        } else {
            LocaleError::Io { path, source }
        }
    }

    /// True when the error only signals a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LocaleError::NotFound { .. })
    }
}
