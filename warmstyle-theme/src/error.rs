//! # Style Cache Error Types
//!
//! Errors surfaced by the style cache layer. The cache itself has no error
//! conditions: style functions are expected to be pure and total, and a panic
//! inside one propagates to the caller unchanged. What remains are
//! configuration problems and theme handles the resolver does not know.

use std::path::PathBuf;
use thiserror::Error;

use crate::handle::ThemeHandle;

/// Errors that can occur in the style cache and warming system.
#[derive(Error, Debug)]
pub enum StyleError {
    /// The theme resolver does not know the requested handle.
    #[error("Theme '{handle}' not found")]
    ThemeNotFound {
        /// The handle that failed to resolve.
        handle: ThemeHandle,
    },

    /// Configuration file was not found.
    #[error("Configuration file not found: {path:?}")]
    ConfigFileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Configuration file has an extension we cannot parse.
    #[error("Unsupported configuration format for {path:?}, use .toml or .json")]
    UnsupportedConfigFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// Error parsing configuration content.
    #[error("Failed to parse configuration: {details}")]
    ConfigParse {
        /// Details about the parse error.
        details: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for style cache operations.
pub type StyleResult<T> = Result<T, StyleError>;

impl StyleError {
    /// Create a theme not found error.
    pub fn not_found(handle: impl Into<ThemeHandle>) -> Self {
        Self::ThemeNotFound {
            handle: handle.into(),
        }
    }

    /// Create a configuration file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigFileNotFound { path: path.into() }
    }

    /// Create a configuration parse error.
    pub fn parse_error(details: impl ToString) -> Self {
        Self::ConfigParse {
            details: details.to_string(),
        }
    }
}

impl From<toml::de::Error> for StyleError {
    fn from(err: toml::de::Error) -> Self {
        Self::parse_error(err)
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err)
    }
}
