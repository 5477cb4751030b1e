//! Error types for agentdocs.
//!
//! Library crates use [`AgentDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all agentdocs operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentDocsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization of an artifact failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Data validation error (bad emit name, invalid base URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AgentDocsError>;

impl AgentDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = AgentDocsError::config("unknown emit target `pdf`");
        assert_eq!(err.to_string(), "config error: unknown emit target `pdf`");

        let err = AgentDocsError::io(
            "/out/llms.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("llms.txt"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn serde_json_errors_convert() {
        let raw = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AgentDocsError = raw.into();
        assert!(err.to_string().starts_with("serialization error"));
    }
}
