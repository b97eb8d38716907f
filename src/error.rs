//! Error types for building and rendering CatGt commands.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the builder can report.
///
/// All variants are produced synchronously, before any output is returned:
/// a render either yields the complete command or one of these errors.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// A required field (data directory, run name, executable) is missing or
    /// empty, or an option name is malformed or reserved.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An option value cannot be expressed as a CatGt flag.
    #[error("unsupported value for option '{option}': {kind}")]
    UnsupportedValueType { option: String, kind: String },

    /// A path could not be turned into an absolute, printable location.
    #[error("invalid path '{}': {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// A settings file could not be read or parsed.
    #[error("settings file '{}': {message}", path.display())]
    Settings { path: PathBuf, message: String },
}

impl BuildError {
    pub(crate) fn unsupported(option: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedValueType {
            option: option.into(),
            kind: kind.into(),
        }
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_the_option() {
        let err = BuildError::unsupported("prb_fld", "table");
        assert_eq!(
            err.to_string(),
            "unsupported value for option 'prb_fld': table"
        );
    }

    #[test]
    fn test_invalid_path_message() {
        let err = BuildError::invalid_path("", "path is empty");
        assert_eq!(err.to_string(), "invalid path '': path is empty");
    }
}
